/// Errors surfaced by journey generation and explain.
///
/// Generation itself cannot fail once the configuration is valid; the only
/// other failure is an empty explain query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JourneyError {
    /// A configuration value is outside its accepted range.
    #[error("invalid config field '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// The explain query was empty or whitespace.
    #[error("Query is required.")]
    EmptyQuery,
}

impl JourneyError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        JourneyError::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
