/// Error types shared across the idea gallery crates.
///
/// Failures setting up access to the ideas data source live here. Application-specific errors
/// are defined in each binary crate and wrap `CommonError` via `#[from]`. Per-request failures
/// stay as `ClientError` and end up in the session's load state.
#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("ideas client setup failed: {0}")]
    ClientSetup(String),
}
