//! Production transport: reqwest-backed SOAP calls against the live
//! endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::domain::{GatewayFault, RemoteValue};
use crate::transport::SmsGateway;
use crate::transport::envelope::{self, Param};

/// Live service endpoint. The service description (WSDL) is published at
/// `?wsdl` on the same URL.
pub const DEFAULT_ENDPOINT: &str = "https://www.web2sms.ro/wsi/service.php";

const SOAP_ACTION_NS: &str = "urn:Web2Sms";

#[derive(Debug, thiserror::Error)]
#[error("transport error: {0}")]
/// The HTTP client could not be assembled from the builder settings.
pub struct GatewayBuildError(#[source] Box<dyn std::error::Error + Send + Sync>);

#[derive(Debug, Clone)]
/// Builder for [`SoapGateway`].
///
/// Use this when you need to customize the endpoint, timeout, or user-agent.
pub struct SoapGatewayBuilder {
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SoapGatewayBuilder {
    /// Create a builder with the default endpoint and no timeout/user-agent
    /// override.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the service endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SoapGateway`].
    pub fn build(self) -> Result<SoapGateway, GatewayBuildError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| GatewayBuildError(Box::new(err)))?;

        Ok(SoapGateway {
            endpoint: self.endpoint,
            client,
        })
    }
}

impl Default for SoapGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
/// [`SmsGateway`] implementation speaking SOAP 1.1 over HTTP.
///
/// Transport failures and undecodable responses surface as [`GatewayFault`]
/// with a bare message; faults reported by the endpoint keep their code and
/// detail.
pub struct SoapGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl SoapGateway {
    /// Create a gateway against the default endpoint.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Start building a gateway with custom settings.
    pub fn builder() -> SoapGatewayBuilder {
        SoapGatewayBuilder::new()
    }

    async fn call(
        &self,
        operation: &'static str,
        params: Vec<Param>,
    ) -> Result<RemoteValue, GatewayFault> {
        let body = envelope::encode_call(operation, &params);
        tracing::debug!(operation, "invoking gateway operation");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{SOAP_ACTION_NS}#{operation}\""))
            .body(body)
            .send()
            .await
            .map_err(|err| GatewayFault::message(err.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| GatewayFault::message(err.to_string()))?;

        // Fault responses arrive with a 500 status; decode before judging
        // the status line so the structured fault wins over a bare "HTTP
        // 500" message.
        match envelope::decode_response(&text) {
            Ok(envelope::Decoded::Value(value)) => Ok(value),
            Ok(envelope::Decoded::Fault(fault)) => {
                tracing::warn!(operation, code = fault.code.as_deref(), "gateway fault");
                Err(fault)
            }
            Err(_) if !(200..=299).contains(&status) => Err(GatewayFault::message(format!(
                "unexpected HTTP status: {status}"
            ))),
            Err(err) => Err(GatewayFault::message(err.to_string())),
        }
    }
}

impl Default for SoapGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsGateway for SoapGateway {
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
    ) -> Result<RemoteValue, GatewayFault> {
        let mut params = vec![
            Param::text("username", username),
            Param::text("authKey", auth_key),
            Param::text("sender", sender),
            Param::text("recipient", recipient),
            Param::text("message", body),
            Param::opt_text("scheduledDate", scheduled_at),
            Param::int("validity", validity_minutes),
        ];
        if let Some(callback_url) = callback_url {
            params.push(Param::text("callbackUrl", callback_url));
        }
        self.call("sendSmsAuthKey", params).await
    }

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
    ) -> Result<RemoteValue, GatewayFault> {
        let mut params = vec![
            Param::text("username", username),
            Param::text("password", password),
            Param::text("sender", sender),
            Param::text("recipient", recipient),
            Param::text("message", body),
            Param::bool("isUnicode", unicode),
            Param::opt_text("scheduledDate", scheduled_at),
        ];
        if let Some(callback_url) = callback_url {
            params.push(Param::text("callbackUrl", callback_url));
        }
        self.call("sendSMS", params).await
    }

    async fn send_session(
        &self,
        session: &str,
        recipient: &str,
        body: &str,
        scheduled_at: Option<&str>,
        sender: &str,
        validity_minutes: u32,
    ) -> Result<RemoteValue, GatewayFault> {
        self.call(
            "sendSession",
            vec![
                Param::text("sessionId", session),
                Param::text("recipient", recipient),
                Param::text("message", body),
                Param::opt_text("scheduledDate", scheduled_at),
                Param::text("sender", sender),
                Param::int("validity", validity_minutes),
            ],
        )
        .await
    }

    async fn open_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RemoteValue, GatewayFault> {
        self.call(
            "openSession",
            vec![
                Param::text("username", username),
                Param::text("password", password),
            ],
        )
        .await
    }

    async fn close_session(&self, session: &str) -> Result<RemoteValue, GatewayFault> {
        self.call("closeSession", vec![Param::text("sessionId", session)])
            .await
    }

    async fn send_wap_push(
        &self,
        recipient: &str,
        url: &str,
        body: &str,
        scheduled_at: Option<&str>,
        sender: &str,
        validity_minutes: u32,
    ) -> Result<RemoteValue, GatewayFault> {
        self.call(
            "sendWapPush",
            vec![
                Param::text("recipient", recipient),
                Param::text("url", url),
                Param::text("message", body),
                Param::opt_text("scheduledDate", scheduled_at),
                Param::text("sender", sender),
                Param::int("validity", validity_minutes),
            ],
        )
        .await
    }

    async fn send_session_wap_push(
        &self,
        session: &str,
        recipient: &str,
        url: &str,
        body: &str,
        scheduled_at: Option<&str>,
        sender: &str,
        validity_minutes: u32,
    ) -> Result<RemoteValue, GatewayFault> {
        self.call(
            "sendWapPush",
            vec![
                Param::text("sessionId", session),
                Param::text("recipient", recipient),
                Param::text("url", url),
                Param::text("message", body),
                Param::opt_text("scheduledDate", scheduled_at),
                Param::text("sender", sender),
                Param::int("validity", validity_minutes),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_endpoint_override_is_applied() {
        let gateway = SoapGateway::builder()
            .endpoint("https://example.invalid/wsi/service.php")
            .build()
            .unwrap();
        assert_eq!(gateway.endpoint, "https://example.invalid/wsi/service.php");

        let gateway = SoapGateway::new();
        assert_eq!(gateway.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn builder_accepts_timeout_and_user_agent() {
        let gateway = SoapGateway::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("web2sms-tests")
            .build();
        assert!(gateway.is_ok());
    }
}
