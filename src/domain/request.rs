use crate::domain::value::CallbackUrl;

#[derive(Debug, Clone, Default)]
/// Per-call overrides for a send operation.
///
/// Every field defaults to "use the configured value". Fields that a given
/// call variant does not carry on the wire are still honored locally where
/// they matter (`unicode` governs body validation for every variant but is
/// only transmitted by the password-mode send).
pub struct SendOptions {
    /// Delivery-report URL for this message, overriding the configured
    /// default callback.
    pub callback_url: Option<CallbackUrl>,
    /// When to send, as the gateway expects it (`YYYY-MM-DD HH:MM:SS` or
    /// ISO-8601). Passed through opaquely; the gateway interprets it.
    pub scheduled_at: Option<String>,
    /// Delivery window in minutes. `Some(0)` and `None` both fall back to
    /// the configured default.
    pub validity_minutes: Option<u32>,
    /// Unicode encoding override for this message.
    pub unicode: Option<bool>,
}

impl SendOptions {
    /// Options that schedule the message for a later date.
    pub fn scheduled(at: impl Into<String>) -> Self {
        Self {
            scheduled_at: Some(at.into()),
            ..Self::default()
        }
    }
}
