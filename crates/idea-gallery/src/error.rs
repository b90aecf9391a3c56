use ideas_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("idea not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_error_converts_transparently() {
        let err = AppError::from(CommonError::ClientSetup("no TLS backend".to_string()));
        assert!(matches!(err, AppError::Common(_)));
        assert_eq!(err.to_string(), "ideas client setup failed: no TLS backend");
    }
}
