//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::SendOptions;
pub use response::{DispatchError, GatewayFault, RemoteValue};
pub use validation::ValidationError;
pub use value::{
    CallbackUrl, MessageBody, PhoneNumber, PushUrl, Recipient, SessionToken, SmsId,
};
