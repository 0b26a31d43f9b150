use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw value a gateway operation returned when no fault was raised.
///
/// The remote interface is stringly typed: an accepted send answers with a
/// tracking id, a rejected one with an error sentence. Anything that is not
/// a string at all (the gateway has been observed answering booleans and
/// empty structs) is carried as [`RemoteValue::Other`] with its raw
/// representation.
pub enum RemoteValue {
    Text(String),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
/// Structured fault raised by the remote endpoint or the transport beneath
/// it.
///
/// `code` and `detail` are present when the endpoint reported a structured
/// fault; plain transport failures (DNS, TLS, timeouts) carry only a
/// message.
pub struct GatewayFault {
    pub code: Option<String>,
    pub message: String,
    pub detail: Option<String>,
}

impl GatewayFault {
    /// Fault with a bare message and no structured detail.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            detail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why a dispatch failed: a plain message (local validation or a
/// non-id value returned by the gateway) or a structured remote fault.
pub enum DispatchError {
    Message(String),
    Fault(GatewayFault),
}

impl DispatchError {
    /// The human-readable message, whichever variant this is.
    pub fn message(&self) -> &str {
        match self {
            Self::Message(message) => message,
            Self::Fault(fault) => &fault.message,
        }
    }

    /// The structured fault, when the failure was one.
    pub fn fault(&self) -> Option<&GatewayFault> {
        match self {
            Self::Message(_) => None,
            Self::Fault(fault) => Some(fault),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for DispatchError {}
