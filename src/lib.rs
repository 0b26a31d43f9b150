//! Typed Rust client for the Netopia Web2SMS SOAP gateway.
//!
//! Three layers: a domain layer of strong types (recipient shapes, message
//! length limits, tracking ids), a transport layer owning the SOAP wire
//! format behind the [`SmsGateway`] seam, and a small client layer that
//! validates inputs, dispatches the right call variant, and classifies the
//! gateway's stringly-typed answers into a success flag plus a readable
//! error.
//!
//! ```rust,no_run
//! use web2sms::{ClientConfig, SendOptions, Web2SmsClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut client = Web2SmsClient::new(ClientConfig {
//!         username: "user".to_owned(),
//!         auth_key: "key".to_owned(),
//!         sender: "0740123456".to_owned(),
//!         ..ClientConfig::default()
//!     });
//!
//!     if client
//!         .send_sms("+40712345678", "hello", &SendOptions::default())
//!         .await
//!     {
//!         println!("queued as {:?}", client.last_sms_id());
//!     } else {
//!         eprintln!("send failed: {:?}", client.last_error());
//!     }
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod transport;

pub use client::{ClientConfig, Web2SmsClient, Web2SmsClientBuilder};
pub use domain::{
    CallbackUrl, DispatchError, GatewayFault, MessageBody, PhoneNumber, PushUrl, Recipient,
    RemoteValue, SendOptions, SessionToken, SmsId, ValidationError,
};
pub use transport::{
    DEFAULT_ENDPOINT, GatewayBuildError, SmsGateway, SoapGateway, SoapGatewayBuilder,
};
