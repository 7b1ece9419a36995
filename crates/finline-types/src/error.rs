use thiserror::Error;

/// Errors from external market-data lookups (used by trait definitions in
/// finline-core; implementations live in finline-infra).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected upstream payload: {0}")]
    Payload(String),

    #[error("no data for '{0}'")]
    NoData(String),

    #[error("completion failed: {0}")]
    Completion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_display() {
        let err = LookupError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream returned HTTP 503: service unavailable"
        );
    }

    #[test]
    fn test_no_data_display() {
        let err = LookupError::NoData("9999".to_string());
        assert_eq!(err.to_string(), "no data for '9999'");
    }
}
