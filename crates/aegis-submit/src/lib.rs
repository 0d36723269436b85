pub mod client;
pub mod report;

pub use client::{SubmissionClient, SubmitError};
pub use report::{SubmissionErrorKind, SubmissionResult};
