use crate::config::FlowConfig;
use identity_core::models::{FileData, InputResult, SendInputRequest, VerificationStatus};
use identity_core::{ApiService, Result, SendInputRequestBuilder};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub identity_id: String,
    pub results: Vec<InputResult>,
    pub accepted: usize,
    pub rejected: usize,
    /// Last status seen while polling; `None` when polling is disabled.
    pub final_status: Option<VerificationStatus>,
}

/// Document first (group 0), then the optional selfie photo and video.
pub fn build_request(config: &FlowConfig) -> SendInputRequest {
    let document = &config.document;
    let mut builder = SendInputRequestBuilder::create_with_document_photo(
        document.metadata(),
        FileData::from_path(&document.front),
        document.back.as_ref().map(FileData::from_path),
    );

    if let Some(selfie) = &config.selfie_photo {
        builder = builder.append_selfie_photo(FileData::from_path(selfie));
    }
    if let Some(video) = &config.selfie_video {
        builder = builder.append_selfie_video(FileData::from_path(video));
    }

    builder.build()
}

pub async fn run_flow(api: &ApiService, config: &FlowConfig) -> Result<FlowReport> {
    let identity = api.create_identity(&config.metadata, None).await?;
    tracing::info!(identity_id = %identity.id, "Identity created");

    let results = api.send_input(&identity.id, build_request(config)).await?;

    for (index, result) in results.iter().enumerate() {
        if let Some(error) = result.error() {
            tracing::warn!(
                identity_id = %identity.id,
                input = index,
                code = error.code.as_str(),
                error_type = error.error_type.as_str(),
                "Input rejected"
            );
        }
    }

    let accepted = results.iter().filter(|r| r.is_success()).count();
    let rejected = results.len() - accepted;

    let final_status = if config.poll.max_attempts > 0 {
        Some(poll_until_complete(api, &identity.id, config).await?)
    } else {
        None
    };

    Ok(FlowReport {
        identity_id: identity.id,
        results,
        accepted,
        rejected,
        final_status,
    })
}

async fn poll_until_complete(
    api: &ApiService,
    identity_id: &str,
    config: &FlowConfig,
) -> Result<VerificationStatus> {
    let interval = Duration::from_secs(config.poll.interval_secs);
    let mut status = VerificationStatus::Pending;

    for attempt in 1..=config.poll.max_attempts {
        let identity = api.fetch_identity(identity_id).await?;
        status = identity.status;
        tracing::debug!(identity_id, attempt, status = ?status, "Polled identity");

        if status == VerificationStatus::Complete {
            break;
        }
        if attempt < config.poll.max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    if status != VerificationStatus::Complete {
        tracing::warn!(identity_id, status = ?status, "Verification not complete after polling");
    }

    Ok(status)
}
