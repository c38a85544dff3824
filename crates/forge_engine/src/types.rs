use std::fmt;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CompletionFinished {
        request_id: RequestId,
        result: Result<Completion, CompletionError>,
    },
}

/// A successful reply from the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Verbatim generated text.
    pub text: String,
    pub model: String,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionError {
    pub kind: FailureKind,
    pub message: String,
}

impl CompletionError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for CompletionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    MissingApiKey,
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Malformed,
    Blocked { reason: String },
    /// The background worker is no longer accepting requests.
    EngineStopped,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::MissingApiKey => write!(f, "missing api key"),
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::Blocked { reason } => write!(f, "prompt blocked ({reason})"),
            FailureKind::EngineStopped => write!(f, "engine stopped"),
        }
    }
}
