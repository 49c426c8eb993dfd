use serde_json::Value;

/// Everything that can go wrong during one request cycle.
///
/// A body that is not valid JSON has no variant here: the pollen client
/// downgrades it to an empty payload.
#[derive(Debug, thiserror::Error)]
pub enum PollenError {
    /// No API key could be resolved. Fatal until the environment is fixed.
    #[error(
        "Missing API key in .env. Add one of: {}.",
        crate::credentials::API_KEY_VARS.join(", ")
    )]
    Config,

    #[error("Area not found: {area}")]
    NotFound { area: String },

    #[error("{0}")]
    Geocoding(String),

    #[error("Authentication failed ({status}). Check your Ambee API key in .env.")]
    Auth { status: u16 },

    #[error("API error: {status}")]
    Api { status: u16, payload: Value },

    /// Connection failures and timeouts of the pollen request.
    #[error("Pollen request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PollenError {
    /// Whether the user can simply try again (possibly with other input).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PollenError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_variable() {
        let msg = PollenError::Config.to_string();
        assert!(msg.contains("AMBEE_API_KEY, AMBEE_KEY, API_KEY"));
        assert!(!PollenError::Config.is_recoverable());
    }

    #[test]
    fn not_found_keeps_input_verbatim() {
        let err = PollenError::NotFound { area: "zzqx  Nowhere!".into() };
        assert_eq!(err.to_string(), "Area not found: zzqx  Nowhere!");
        assert!(err.is_recoverable());
    }
}
