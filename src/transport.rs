use std::cell::RefCell;

use thiserror::Error;

use crate::message::Message;
use crate::Verified;

/// Error returned when the transport fails to take an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error ({kind}): {reason}")]
pub struct TransportError {
    kind: TransportErrorKind,
    reason: String,
}

impl TransportError {
    /// Creates a transport error; `reason` is the provider's detail.
    pub fn new(kind: TransportErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

/// Why the envelope was not taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportErrorKind {
    /// The provider could not be reached.
    #[error("provider unreachable")]
    Io,
    /// The provider refused the envelope.
    #[error("rejected by provider")]
    Rejected,
}

/// Sends verified envelopes.
///
/// `send` accepts only `&Verified<Message>`: an envelope that has not been
/// through [`envelope::verify`](crate::envelope::verify) cannot be handed to
/// a transport.
///
/// ```compile_fail
/// use formrelay_core::{Destination, Message, Transport, VecTransport};
///
/// let message = Message::from_parts("F <f@x.com>", vec![], Destination::default(), "s", "b");
/// VecTransport::new().send(&message).unwrap();
/// ```
pub trait Transport {
    /// Hands `message` to the delivery provider.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the provider could not be reached or
    /// refused the envelope. The relay does not retry.
    fn send(&self, message: &Verified<Message>) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, message: &Verified<Message>) -> Result<(), TransportError> {
        (**self).send(message)
    }
}

/// An in-memory transport that records every envelope it is given.
///
/// # Examples
///
/// ```
/// use formrelay_core::VecTransport;
///
/// let transport = VecTransport::new();
/// assert!(transport.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct VecTransport {
    sent: RefCell<Vec<Message>>,
    fail_with: Option<TransportErrorKind>,
}

impl VecTransport {
    /// Creates an empty transport that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that fails every send with `kind`.
    pub fn failing(kind: TransportErrorKind) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail_with: Some(kind),
        }
    }

    /// Number of envelopes sent.
    pub fn len(&self) -> usize {
        self.sent.borrow().len()
    }

    /// Returns `true` if nothing was sent.
    pub fn is_empty(&self) -> bool {
        self.sent.borrow().is_empty()
    }

    /// Borrowed access to the sent envelopes.
    pub fn with_sent<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Message]) -> R,
    {
        f(&self.sent.borrow())
    }

    /// Consumes the transport and returns the sent envelopes.
    pub fn into_vec(self) -> Vec<Message> {
        self.sent.into_inner()
    }
}

impl Transport for VecTransport {
    fn send(&self, message: &Verified<Message>) -> Result<(), TransportError> {
        if let Some(kind) = self.fail_with {
            return Err(TransportError::new(kind, "configured to fail"));
        }
        self.sent.borrow_mut().push(message.as_ref().clone());
        Ok(())
    }
}
