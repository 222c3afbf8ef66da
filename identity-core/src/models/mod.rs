pub mod identity;
pub mod send_input;
pub mod send_input_response;
pub mod verification;
pub mod webhook;

pub use identity::{IdentityResource, VerificationStatus};
pub use send_input::{
    DocumentMetadata, DocumentPhotoData, DocumentType, FileData, FileRecord, FileSource, Input,
    InputData, InputType, MediaType, Page, SelfieData, SendInputRequest,
};
pub use send_input_response::{
    InputError, InputErrorCode, InputErrorType, InputResult, SendInputResponse,
};
pub use verification::{
    Field, IdentityState, Step, StepError, StepErrorType, StepId, VerificationDocument,
    VerificationResource,
};
pub use webhook::{EventName, WebhookResource};
