//! Scripted end-to-end verification run on top of `identity-core`.
pub mod config;
pub mod flow;

pub use config::FlowConfig;
pub use flow::{build_request, run_flow, FlowReport};
