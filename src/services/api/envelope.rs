use serde::Deserialize;

/// Response wrapper used by every endpoint: `{ success, data?, error? }`.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Error text from a failed response, whichever field carries it.
    pub fn error_message(&self) -> Option<String> {
        self.error.clone().or_else(|| self.message.clone())
    }
}

/// Body of an error response whose data type is irrelevant.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
