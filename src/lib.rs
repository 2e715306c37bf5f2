//! Validation and envelope construction for untrusted form submissions.
//!
//! A public HTML form posts URL-encoded fields. Some of them name recipients,
//! either as plaintext addresses or as encrypted tokens so that the real
//! address never reaches the browser. This crate turns such a submission
//! into a well-formed outbound envelope, or into the first rule it broke.
//!
//! # Pipeline
//!
//! ```text
//! FormSubmission ─normalize─▶ Request ─RequestValidator─▶ Verified<Request>
//!     ─MessageBuilder─▶ Message ─envelope::verify─▶ Verified<Message> ─▶ Transport
//! ```
//!
//! # Core Types
//!
//! - [`Tainted<T>`]: raw client input, readable only by the normalizer
//! - [`Verified<T>`]: proof that a request or envelope passed its validator
//! - [`Secret<T>`]: the recipient key, redacted in logs
//! - [`FieldRules`]: which field names drive the relay
//! - [`Rejection`]: the first violated rule
//!
//! # Examples
//!
//! ```
//! use formrelay_core::{envelope, FieldRules, MessageBuilder, PlaintextOnly, RequestValidator};
//! use formrelay_core::{Secret, SenderIdentity, Transport, VecTransport};
//! use formrelay_core::web::{normalize, FormSubmission};
//!
//! let rules = FieldRules::default();
//! let key = Secret::new("relay-key".to_string());
//! let submission = FormSubmission::new("name=Jo&_to=a%40x.com")
//!     .with_source_origin("203.0.113.7");
//!
//! let request = normalize(&submission, &rules, &PlaintextOnly, &key);
//! let request = RequestValidator::new(&rules).verify(request).expect("valid submission");
//!
//! let identity = SenderIdentity::new("Form", Some("arn:aws:iam::1:role/x".to_string()));
//! let message = MessageBuilder::new(&identity, "Contact").build(&request, &rules);
//! assert_eq!(message.sender(), "Form <x>");
//! assert_eq!(message.body(), "NAME: Jo\r\n");
//!
//! let message = envelope::verify(message).expect("well-formed envelope");
//! let transport = VecTransport::new();
//! transport.send(&message).expect("recorded");
//! assert_eq!(transport.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
mod cipher;
mod config;
pub mod envelope;
mod error;
mod fields;
mod logging;
mod message;
mod request;
mod secret;
pub mod syntax;
mod tainted;
mod transport;
mod validate;
mod verified;
pub mod web;

#[cfg(test)]
mod test_utils;

pub use address::Address;
pub use cipher::{AddressCipher, CipherError, PlaintextOnly};
pub use config::{ConfigError, RelayConfig};
pub use error::{Error, Rejection, RejectionKind};
pub use fields::FieldRules;
pub use logging::SubmissionLog;
pub use message::{render_body, Destination, Message, MessageBuilder, SenderIdentity};
pub use request::{FormFields, Recipients, Request, ResponseFormat};
pub use secret::Secret;
pub use tainted::Tainted;
pub use transport::{Transport, TransportError, TransportErrorKind, VecTransport};
pub use validate::{RequestRule, RequestValidator, Whitelist};
pub use verified::Verified;
