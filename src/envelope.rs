//! Final checks on a constructed envelope.
//!
//! A request that passed [`RequestValidator`](crate::RequestValidator) always
//! produces an envelope that passes here; a failure means the builder or its
//! configuration is wrong, not the client.

use crate::error::Rejection;
use crate::message::Message;
use crate::syntax::is_email;
use crate::Verified;

/// Checks `message`, stopping at the first failure.
///
/// Order: sender, subject, body, reply-to, to, cc, bcc.
///
/// # Errors
///
/// Returns a `Rejection` of kind `InvalidEnvelope`. Address failures name
/// the category and the address.
pub fn validate(message: &Message) -> Result<(), Rejection> {
    if sender_address(message.sender()).is_none() {
        return Err(Rejection::invalid_envelope("Invalid sender"));
    }

    if message.subject().is_empty() {
        return Err(Rejection::invalid_envelope("Invalid subject"));
    }

    if message.body().is_empty() {
        return Err(Rejection::invalid_envelope("Invalid body"));
    }

    let destination = message.destination();
    let groups: [(&str, &[String]); 4] = [
        ("reply-to", message.reply_to()),
        ("to", &destination.to),
        ("cc", &destination.cc),
        ("bcc", &destination.bcc),
    ];

    for (category, addresses) in groups {
        if let Some(address) = addresses.iter().find(|address| !is_email(address)) {
            return Err(Rejection::invalid_envelope(format!(
                "Invalid {} address: {}",
                category, address
            )));
        }
    }

    Ok(())
}

/// Validates `message` and wraps it for the transport.
///
/// # Errors
///
/// Returns the first `InvalidEnvelope` rejection.
pub fn verify(message: Message) -> Result<Verified<Message>, Rejection> {
    validate(&message)?;
    Ok(Verified::new_unchecked(message))
}

/// The non-empty text between the first `<` and the following `>`.
fn sender_address(sender: &str) -> Option<&str> {
    let (_, rest) = sender.split_once('<')?;
    let (address, _) = rest.split_once('>')?;
    (!address.is_empty()).then_some(address)
}
