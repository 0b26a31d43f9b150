//! Client layer: validates inputs, picks the right call variant, and
//! classifies the gateway's stringly-typed answers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    CallbackUrl, DispatchError, GatewayFault, MessageBody, PushUrl, Recipient, RemoteValue,
    SendOptions, SessionToken, SmsId, ValidationError,
};
use crate::transport::{GatewayBuildError, SmsGateway, SoapGateway, SoapGatewayBuilder};

#[derive(Debug, Clone, Default)]
/// Account credentials and per-client defaults.
///
/// Immutable after construction except `sender`, which can be updated with
/// [`Web2SmsClient::set_sender`]. Leave `auth_key` empty when only
/// password-mode or session sends are used, and vice versa.
pub struct ClientConfig {
    pub username: String,
    pub password: String,
    pub auth_key: String,
    /// Sender phone number registered with the account.
    pub sender: String,
    /// Default delivery-report URL, used when a send passes none.
    pub callback_url: Option<CallbackUrl>,
    /// Default unicode encoding flag.
    pub unicode: bool,
    /// Default delivery window in minutes; `0` leaves the choice to the
    /// gateway.
    pub default_validity: u32,
}

#[derive(Debug)]
/// Builder for [`Web2SmsClient`].
///
/// Use this when the production gateway needs a custom endpoint, timeout,
/// or user-agent.
pub struct Web2SmsClientBuilder {
    config: ClientConfig,
    gateway: SoapGatewayBuilder,
}

impl Web2SmsClientBuilder {
    /// Create a builder with default transport settings.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            gateway: SoapGatewayBuilder::new(),
        }
    }

    /// Override the service endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.gateway = self.gateway.endpoint(endpoint);
        self
    }

    /// Set an HTTP timeout applied to each gateway call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.gateway = self.gateway.timeout(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.gateway = self.gateway.user_agent(user_agent);
        self
    }

    /// Build a [`Web2SmsClient`].
    pub fn build(self) -> Result<Web2SmsClient, GatewayBuildError> {
        let gateway = self.gateway.build()?;
        Ok(Web2SmsClient::with_gateway(self.config, Arc::new(gateway)))
    }
}

/// High-level Web2SMS client.
///
/// Each send variant validates the recipient and message locally, invokes
/// one gateway operation, and classifies the returned value: a string of
/// 32..=60 bytes is the tracking id of an accepted message, anything else is
/// a failure. No send or session method returns an error directly — they
/// answer `true`/`false`, and the details of the most recent dispatch are
/// read back through [`last_sms_id`](Self::last_sms_id),
/// [`last_error`](Self::last_error), and [`last_fault`](Self::last_fault).
///
/// The client is single-threaded by design: outcomes and the session token
/// are plain mutable state, overwritten by every call.
pub struct Web2SmsClient {
    config: ClientConfig,
    gateway: Arc<dyn SmsGateway>,
    session: Option<SessionToken>,
    last_sms_id: Option<SmsId>,
    last_error: Option<DispatchError>,
}

impl Web2SmsClient {
    /// Create a client against the live endpoint.
    ///
    /// For endpoint/timeout customization use [`Web2SmsClient::builder`].
    pub fn new(config: ClientConfig) -> Self {
        Self::with_gateway(config, Arc::new(SoapGateway::new()))
    }

    /// Start building a client with custom transport settings.
    pub fn builder(config: ClientConfig) -> Web2SmsClientBuilder {
        Web2SmsClientBuilder::new(config)
    }

    /// Create a client over a custom [`SmsGateway`] implementation.
    ///
    /// This is the seam tests use to substitute a fake gateway; it also
    /// admits alternative transports.
    pub fn with_gateway(config: ClientConfig, gateway: Arc<dyn SmsGateway>) -> Self {
        Self {
            config,
            gateway,
            session: None,
            last_sms_id: None,
            last_error: None,
        }
    }

    // --- send variants ---

    /// Send an SMS authenticated by username + auth key.
    pub async fn send_sms(&mut self, recipient: &str, body: &str, options: &SendOptions) -> bool {
        let outcome = self.try_send_sms(recipient, body, options).await;
        self.record(outcome)
    }

    /// Send an SMS authenticated by username + password.
    pub async fn send_simple_sms(
        &mut self,
        recipient: &str,
        body: &str,
        options: &SendOptions,
    ) -> bool {
        let outcome = self.try_send_simple_sms(recipient, body, options).await;
        self.record(outcome)
    }

    /// Send an SMS within the open session.
    ///
    /// Fails with `No session opened` — without touching the gateway — when
    /// [`open_session`](Self::open_session) has not stored a token.
    pub async fn send_session_sms(
        &mut self,
        recipient: &str,
        body: &str,
        options: &SendOptions,
    ) -> bool {
        let outcome = self.try_send_session_sms(recipient, body, options).await;
        self.record(outcome)
    }

    /// Send a WAP-push message carrying a clickable URL.
    pub async fn send_wap_push(
        &mut self,
        recipient: &str,
        url: &str,
        body: &str,
        options: &SendOptions,
    ) -> bool {
        let outcome = self.try_send_wap_push(recipient, url, body, options).await;
        self.record(outcome)
    }

    /// Send a WAP-push message within the open session.
    pub async fn send_session_wap_push(
        &mut self,
        recipient: &str,
        url: &str,
        body: &str,
        options: &SendOptions,
    ) -> bool {
        let outcome = self
            .try_send_session_wap_push(recipient, url, body, options)
            .await;
        self.record(outcome)
    }

    // --- session lifecycle ---

    /// Open a session with username + password.
    ///
    /// A no-op returning `true` when a session is already open. Otherwise
    /// the call succeeds on any non-fault answer, even one that carries no
    /// usable token — the gateway has been observed doing both; only a
    /// non-empty string answer actually stores a token.
    pub async fn open_session(&mut self) -> bool {
        if self.session.is_some() {
            return true;
        }
        match self
            .gateway
            .open_session(&self.config.username, &self.config.password)
            .await
        {
            Ok(RemoteValue::Text(token)) => {
                self.session = SessionToken::new(token).ok();
                true
            }
            Ok(RemoteValue::Other(_)) => true,
            Err(fault) => {
                tracing::warn!("open session failed: {}", fault.message);
                self.last_error = Some(DispatchError::Fault(fault));
                false
            }
        }
    }

    /// Whether a session token is currently held.
    pub fn is_session_open(&self) -> bool {
        self.session.is_some()
    }

    /// Close the open session, if any, and return the client for chaining.
    ///
    /// The token is cleared even when the remote close faults; the fault is
    /// recorded as the last error.
    pub async fn close_session(&mut self) -> &mut Self {
        if let Some(session) = self.session.take() {
            if let Err(fault) = self.gateway.close_session(session.as_str()).await {
                tracing::warn!("close session failed: {}", fault.message);
                self.last_error = Some(DispatchError::Fault(fault));
            }
        }
        self
    }

    // --- mutable sender ---

    /// Update the sender number used by subsequent sends.
    pub fn set_sender(&mut self, sender: impl Into<String>) {
        self.config.sender = sender.into();
    }

    /// The sender number currently in use.
    pub fn sender(&self) -> &str {
        &self.config.sender
    }

    // --- last-outcome accessors ---

    /// Tracking id of the most recent accepted message.
    pub fn last_sms_id(&self) -> Option<&SmsId> {
        self.last_sms_id.as_ref()
    }

    /// Message of the most recent failure. Cleared by a subsequent
    /// successful dispatch.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_ref().map(DispatchError::message)
    }

    /// Structured fault of the most recent failure, when it was one.
    pub fn last_fault(&self) -> Option<&GatewayFault> {
        self.last_error.as_ref().and_then(DispatchError::fault)
    }

    /// Token of the open session, if any.
    pub fn session_token(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    // --- dispatch internals ---

    async fn try_send_sms(
        &self,
        recipient: &str,
        body: &str,
        options: &SendOptions,
    ) -> Result<RemoteValue, DispatchError> {
        let recipient = Recipient::new(recipient).map_err(local)?;
        let body = MessageBody::new(body, self.effective_unicode(options)).map_err(local)?;
        self.gateway
            .send_sms_auth_key(
                &self.config.username,
                &self.config.auth_key,
                &self.config.sender,
                recipient.as_str(),
                body.as_str(),
                options.scheduled_at.as_deref(),
                self.effective_validity(options),
                self.effective_callback(options),
            )
            .await
            .map_err(DispatchError::Fault)
    }

    async fn try_send_simple_sms(
        &self,
        recipient: &str,
        body: &str,
        options: &SendOptions,
    ) -> Result<RemoteValue, DispatchError> {
        let unicode = self.effective_unicode(options);
        let recipient = Recipient::new(recipient).map_err(local)?;
        let body = MessageBody::new(body, unicode).map_err(local)?;
        self.gateway
            .send_sms(
                &self.config.username,
                &self.config.password,
                &self.config.sender,
                recipient.as_str(),
                body.as_str(),
                unicode,
                options.scheduled_at.as_deref(),
                self.effective_callback(options),
            )
            .await
            .map_err(DispatchError::Fault)
    }

    async fn try_send_session_sms(
        &self,
        recipient: &str,
        body: &str,
        options: &SendOptions,
    ) -> Result<RemoteValue, DispatchError> {
        let session = self.open_session_token()?;
        let recipient = Recipient::new(recipient).map_err(local)?;
        let body = MessageBody::new(body, self.effective_unicode(options)).map_err(local)?;
        self.gateway
            .send_session(
                session.as_str(),
                recipient.as_str(),
                body.as_str(),
                options.scheduled_at.as_deref(),
                &self.config.sender,
                self.effective_validity(options),
            )
            .await
            .map_err(DispatchError::Fault)
    }

    async fn try_send_wap_push(
        &self,
        recipient: &str,
        url: &str,
        body: &str,
        options: &SendOptions,
    ) -> Result<RemoteValue, DispatchError> {
        let recipient = Recipient::new(recipient).map_err(local)?;
        let url = PushUrl::new(url).map_err(local)?;
        let body = MessageBody::new(body, self.effective_unicode(options)).map_err(local)?;
        self.gateway
            .send_wap_push(
                recipient.as_str(),
                url.as_str(),
                body.as_str(),
                options.scheduled_at.as_deref(),
                &self.config.sender,
                self.effective_validity(options),
            )
            .await
            .map_err(DispatchError::Fault)
    }

    async fn try_send_session_wap_push(
        &self,
        recipient: &str,
        url: &str,
        body: &str,
        options: &SendOptions,
    ) -> Result<RemoteValue, DispatchError> {
        let session = self.open_session_token()?;
        let recipient = Recipient::new(recipient).map_err(local)?;
        let url = PushUrl::new(url).map_err(local)?;
        let body = MessageBody::new(body, self.effective_unicode(options)).map_err(local)?;
        self.gateway
            .send_session_wap_push(
                session.as_str(),
                recipient.as_str(),
                url.as_str(),
                body.as_str(),
                options.scheduled_at.as_deref(),
                &self.config.sender,
                self.effective_validity(options),
            )
            .await
            .map_err(DispatchError::Fault)
    }

    fn open_session_token(&self) -> Result<&SessionToken, DispatchError> {
        self.session.as_ref().ok_or_else(|| local(ValidationError::NoSession))
    }

    fn effective_callback<'a>(&'a self, options: &'a SendOptions) -> Option<&'a str> {
        options
            .callback_url
            .as_ref()
            .or(self.config.callback_url.as_ref())
            .map(CallbackUrl::as_str)
    }

    fn effective_validity(&self, options: &SendOptions) -> u32 {
        options
            .validity_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(self.config.default_validity)
    }

    fn effective_unicode(&self, options: &SendOptions) -> bool {
        options.unicode.unwrap_or(self.config.unicode)
    }

    fn record(&mut self, outcome: Result<RemoteValue, DispatchError>) -> bool {
        match outcome.and_then(classify) {
            Ok(id) => {
                tracing::debug!(sms_id = id.as_str(), "message accepted");
                self.last_sms_id = Some(id);
                self.last_error = None;
                true
            }
            Err(error) => {
                tracing::warn!("dispatch failed: {}", error.message());
                self.last_error = Some(error);
                false
            }
        }
    }
}

fn local(error: ValidationError) -> DispatchError {
    DispatchError::Message(error.to_string())
}

/// A string of tracking-id length is an accepted message; any other answer
/// is a rejection carried in-band.
fn classify(value: RemoteValue) -> Result<SmsId, DispatchError> {
    match value {
        RemoteValue::Text(text) => match SmsId::new(text.as_str()) {
            Ok(id) => Ok(id),
            Err(_) => Err(DispatchError::Message(text)),
        },
        RemoteValue::Other(_) => Err(DispatchError::Message("Unknown error !".to_owned())),
    }
}
