use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestCompletion {
        request_id: RequestId,
        instruction: String,
    },
    Notify(Notification),
    CopyToClipboard {
        code: String,
    },
    OpenDetached {
        code: String,
        description: String,
    },
}

/// The user-facing status channel. There are exactly four events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    EmptyDescription,
    GenerationSucceeded,
    GenerationFailed { reason: String },
    CodeCopied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Notification {
    pub fn message(&self) -> &'static str {
        match self {
            Notification::EmptyDescription => "Please enter a prompt",
            Notification::GenerationSucceeded => "Code generated successfully!",
            Notification::GenerationFailed { .. } => "Failed to get response from AI.",
            Notification::CodeCopied => "Code copied to clipboard",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Notification::EmptyDescription | Notification::GenerationFailed { .. } => {
                Severity::Error
            }
            Notification::GenerationSucceeded | Notification::CodeCopied => Severity::Success,
        }
    }

    /// Extra context appended to the message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Notification::GenerationFailed { reason } if !reason.is_empty() => Some(reason),
            _ => None,
        }
    }
}
