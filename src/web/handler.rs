//! End-to-end submission handling.
//!
//! [`Relay::handle`] runs the whole chain for one submission and shapes the
//! reply. HTTP routing stays with the host: it turns its request into a
//! [`FormSubmission`] and its response out of a [`Reply`].

use serde::Serialize;

use crate::cipher::AddressCipher;
use crate::config::RelayConfig;
use crate::envelope;
use crate::error::{Error, Rejection, RejectionKind};
use crate::logging::SubmissionLog;
use crate::message::MessageBuilder;
use crate::request::ResponseFormat;
use crate::transport::Transport;
use crate::validate::{RequestValidator, Whitelist};

use super::{normalize, FormSubmission, RequestContext};

/// What a successful submission reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Reply format the client asked for.
    pub format: ResponseFormat,
    /// Where to send the browser afterwards, if anywhere.
    pub redirect: Option<String>,
    /// Number of envelope recipients across to, cc and bcc.
    pub recipient_count: usize,
}

/// The reply for the host to turn into an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// `Location` target for redirects.
    pub location: Option<String>,
    /// `Content-Type` of `body`.
    pub content_type: &'static str,
    /// Response body.
    pub body: String,
}

#[derive(Serialize)]
struct JsonReply<'a> {
    success: bool,
    message: &'a str,
}

impl Reply {
    const HTML: &'static str = "text/html; charset=utf-8";
    const JSON: &'static str = "application/json";

    fn render(status: u16, format: &ResponseFormat, success: bool, message: &str) -> Self {
        match format {
            ResponseFormat::Json => Self {
                status,
                location: None,
                content_type: Self::JSON,
                body: serde_json::to_string(&JsonReply { success, message })
                    .unwrap_or_else(|_| String::from("{}")),
            },
            // An unrecognized format is answered in HTML.
            ResponseFormat::Html | ResponseFormat::Unrecognized(_) => Self {
                status,
                location: None,
                content_type: Self::HTML,
                body: format!(
                    "<!DOCTYPE html><html><body><p>{}</p></body></html>",
                    escape_html(message)
                ),
            },
        }
    }

    /// Builds the reply for a delivered submission.
    pub fn delivered(delivery: &Delivery) -> Self {
        match &delivery.redirect {
            Some(location) => Self {
                status: 303,
                location: Some(location.clone()),
                content_type: Self::HTML,
                body: String::new(),
            },
            None => Self::render(200, &delivery.format, true, "Message sent"),
        }
    }

    /// Builds the reply for a failed submission.
    ///
    /// Only client errors carry their message; server-side failures are
    /// answered generically.
    pub fn failed(error: &Error, format: &ResponseFormat) -> Self {
        let (status, message) = match error {
            Error::Rejected(rejection) => (status_for(rejection), public_message(rejection)),
            Error::Transport(_) => (502, "Message could not be delivered"),
            Error::Config(_) => (500, "Internal error"),
        };
        Self::render(status, format, false, message)
    }
}

fn status_for(rejection: &Rejection) -> u16 {
    match rejection.kind() {
        RejectionKind::Forbidden => 403,
        RejectionKind::UnprocessableInput => 422,
        RejectionKind::MalformedOrigin | RejectionKind::InvalidEnvelope => 500,
    }
}

fn public_message(rejection: &Rejection) -> &str {
    if rejection.is_client_error() {
        rejection.message()
    } else {
        "Internal error"
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Relays form submissions to a transport.
///
/// # Examples
///
/// ```
/// use formrelay_core::{PlaintextOnly, RelayConfig, VecTransport};
/// use formrelay_core::web::{FormSubmission, Relay};
///
/// let config = RelayConfig::from_toml(r#"
///     key = "k"
///     subject = "New submission"
///     [sender]
///     display_name = "Form"
///     locator = "identity/forms@example.com"
/// "#).unwrap();
/// let transport = VecTransport::new();
/// let relay = Relay::new(config, PlaintextOnly, &transport);
///
/// let submission = FormSubmission::new("_to=a%40x.com&name=Jo")
///     .with_query("format=json")
///     .with_source_origin("203.0.113.7");
/// let reply = relay.handle(&submission);
///
/// assert_eq!(reply.status, 200);
/// assert_eq!(transport.len(), 1);
/// ```
#[derive(Debug)]
pub struct Relay<C, T> {
    config: RelayConfig,
    whitelist: Option<Whitelist>,
    cipher: C,
    transport: T,
}

impl<C: AddressCipher, T: Transport> Relay<C, T> {
    /// Creates a relay. `config` should already have been validated.
    pub fn new(config: RelayConfig, cipher: C, transport: T) -> Self {
        let whitelist = config.whitelist();
        Self {
            config,
            whitelist,
            cipher,
            transport,
        }
    }

    /// The configuration this relay runs with.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Handles one submission and returns the reply to send.
    pub fn handle(&self, submission: &FormSubmission) -> Reply {
        let log = SubmissionLog::new(submission.source_origin().unwrap_or_default());

        match self.process(submission, &log) {
            Ok(delivery) => {
                log.info(format_args!(
                    "envelope sent to {} recipient(s)",
                    delivery.recipient_count
                ));
                Reply::delivered(&delivery)
            }
            Err((error, format)) => {
                match &error {
                    Error::Rejected(rejection) if rejection.is_client_error() => {
                        log.warn(format_args!("submission rejected: {}", rejection));
                    }
                    other => log.error(format_args!("submission failed: {}", other)),
                }
                Reply::failed(&error, &format)
            }
        }
    }

    /// Runs normalize, validate, build, validate and send.
    ///
    /// # Errors
    ///
    /// Returns the failure together with the reply format the client
    /// asked for, so the caller can still answer in kind.
    pub fn process(
        &self,
        submission: &FormSubmission,
        log: &SubmissionLog<'_>,
    ) -> Result<Delivery, (Error, ResponseFormat)> {
        let rules = &self.config.fields;

        let request = normalize(submission, rules, &self.cipher, &self.config.key);
        let format = request.response_format().clone();
        log.debug(format_args!(
            "normalized {} field(s), format {}",
            request.fields().len(),
            format
        ));

        let redirect = request.redirect_url().map(str::to_string);

        let request = RequestValidator::new(rules)
            .with_whitelist(self.whitelist.as_ref())
            .verify(request)
            .map_err(|rejection| (Error::from(rejection), format.clone()))?;

        let message = MessageBuilder::new(&self.config.sender, self.config.subject.as_str())
            .reply_to_override(self.config.reply_to.clone())
            .build(&request, rules);

        let message =
            envelope::verify(message).map_err(|rejection| (Error::from(rejection), format.clone()))?;

        self.transport
            .send(&message)
            .map_err(|err| (Error::from(err), format.clone()))?;

        let destination = message.as_ref().destination();
        Ok(Delivery {
            format,
            redirect,
            recipient_count: destination.to.len() + destination.cc.len() + destination.bcc.len(),
        })
    }
}
