use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    RecipientFormat { number: String },
    EmptyMessage,
    MessageTooLong { limit: usize },
    NoSession,
    InvalidUrl { field: &'static str, input: String },
    InvalidPhoneNumber { input: String },
    SmsIdLength { actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            // The next four messages are part of the gateway-facing contract;
            // callers match on them verbatim.
            Self::RecipientFormat { number } => {
                write!(f, "Incorrect format for phone number: {number}")
            }
            Self::EmptyMessage => write!(f, "No message"),
            Self::MessageTooLong { .. } => write!(f, "Maximum SMS length exceeded"),
            Self::NoSession => write!(f, "No session opened"),
            Self::InvalidUrl { field, input } => write!(f, "invalid {field} url: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::SmsIdLength { actual } => {
                write!(f, "sms id length out of range: {actual} (expected 32..=60)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
