//! Transport layer: the remote-operation seam and the SOAP wire format.

mod envelope;
mod gateway;

pub use gateway::{DEFAULT_ENDPOINT, GatewayBuildError, SoapGateway, SoapGatewayBuilder};

use async_trait::async_trait;

use crate::domain::{GatewayFault, RemoteValue};

/// The gateway's remote operations, one method per call variant.
///
/// This is the dependency-injection seam of the crate: [`SoapGateway`] is the
/// production implementation, and tests substitute a fake returning canned
/// values and faults. Each operation resolves to either the raw value the
/// endpoint returned or a [`GatewayFault`] covering both structured remote
/// faults and transport failures.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// `sendSmsAuthKey` — send authenticated by username + auth key.
    ///
    /// When `callback_url` is `None` the wire call omits the argument
    /// entirely (the endpoint overloads on arity).
    #[allow(clippy::too_many_arguments)]
    async fn send_sms_auth_key(
        &self,
        username: &str,
        auth_key: &str,
        sender: &str,
        recipient: &str,
        body: &str,
        scheduled_at: Option<&str>,
        validity_minutes: u32,
        callback_url: Option<&str>,
    ) -> Result<RemoteValue, GatewayFault>;

    /// `sendSMS` — send authenticated by username + password.
    #[allow(clippy::too_many_arguments)]
    async fn send_sms(
        &self,
        username: &str,
        password: &str,
        sender: &str,
        recipient: &str,
        body: &str,
        unicode: bool,
        scheduled_at: Option<&str>,
        callback_url: Option<&str>,
    ) -> Result<RemoteValue, GatewayFault>;

    /// `sendSession` — send within an open session.
    async fn send_session(
        &self,
        session: &str,
        recipient: &str,
        body: &str,
        scheduled_at: Option<&str>,
        sender: &str,
        validity_minutes: u32,
    ) -> Result<RemoteValue, GatewayFault>;

    /// `openSession` — obtain a session token for username + password.
    async fn open_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RemoteValue, GatewayFault>;

    /// `closeSession` — invalidate a session token.
    async fn close_session(&self, session: &str) -> Result<RemoteValue, GatewayFault>;

    /// `sendWapPush` — send a WAP-push message carrying a target URL.
    async fn send_wap_push(
        &self,
        recipient: &str,
        url: &str,
        body: &str,
        scheduled_at: Option<&str>,
        sender: &str,
        validity_minutes: u32,
    ) -> Result<RemoteValue, GatewayFault>;

    /// `sendWapPush` (session overload) — WAP-push within an open session.
    #[allow(clippy::too_many_arguments)]
    async fn send_session_wap_push(
        &self,
        session: &str,
        recipient: &str,
        url: &str,
        body: &str,
        scheduled_at: Option<&str>,
        sender: &str,
        validity_minutes: u32,
    ) -> Result<RemoteValue, GatewayFault>;
}
