//! Erros de transporte ao falar com o serviço de notas.
//!
//! [`ApiError`] cobre respostas HTTP não-2xx, falhas de rede e corpos que
//! não puderam ser decodificados. O poller trata todas as três como falhas
//! de transporte elegíveis para retentativa.

use thiserror::Error;

/// Errors that can occur while calling the notes service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Underlying network failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The body was not the JSON shape we expected.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        let err = ApiError::Status {
            status: 503,
            message: "worker pool busy".into(),
        };
        assert_eq!(err.to_string(), "API error (status 503): worker pool busy");
    }

    #[test]
    fn decode_display() {
        let err = ApiError::Decode("missing field `task_id`".into());
        assert_eq!(
            err.to_string(),
            "failed to decode response: missing field `task_id`"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
