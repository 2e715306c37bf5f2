//! Envelope construction from a verified request.

use serde::{Deserialize, Serialize};

use crate::fields::FieldRules;
use crate::request::Request;
use crate::Verified;

/// Separator between identity locator path segments.
const LOCATOR_SEPARATOR: char = '/';

/// Line terminator for body lines.
const BODY_LINE_END: &str = "\r\n";

/// Who the relay sends as.
///
/// The address is the last `/`-separated segment of `locator`, so a locator
/// such as `arn:aws:ses:eu-west-1:1:identity/forms@example.com` yields
/// `forms@example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SenderIdentity {
    /// Display name shown to recipients.
    pub display_name: String,
    /// Identity resource locator ending in the sending address.
    #[serde(default)]
    pub locator: Option<String>,
}

impl SenderIdentity {
    /// Creates an identity.
    pub fn new(display_name: impl Into<String>, locator: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            locator,
        }
    }

    /// The sending address, empty when no locator is configured.
    pub fn address(&self) -> &str {
        self.locator
            .as_deref()
            .and_then(|locator| locator.rsplit(LOCATOR_SEPARATOR).next())
            .unwrap_or_default()
    }

    /// `"<display name> <address>"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use formrelay_core::SenderIdentity;
    ///
    /// let identity = SenderIdentity::new("Form", Some("arn:aws:iam::1:role/x".to_string()));
    /// assert_eq!(identity.compose(), "Form <x>");
    /// ```
    pub fn compose(&self) -> String {
        format!("{} <{}>", self.display_name, self.address())
    }
}

/// Where the envelope goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
}

/// The outbound envelope handed to a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    sender: String,
    reply_to: Vec<String>,
    destination: Destination,
    subject: String,
    body: String,
}

impl Message {
    /// Assembles an envelope from parts.
    ///
    /// Nothing is checked here; [`envelope::verify`](crate::envelope::verify)
    /// decides whether the result may be sent.
    pub fn from_parts(
        sender: impl Into<String>,
        reply_to: Vec<String>,
        destination: Destination,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            reply_to,
            destination,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Composed sender string.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Reply-to addresses.
    pub fn reply_to(&self) -> &[String] {
        &self.reply_to
    }

    /// Destination lists.
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Plain-text body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Maps a verified request into a [`Message`].
///
/// # Examples
///
/// ```
/// use formrelay_core::{FieldRules, MessageBuilder, PlaintextOnly, RequestValidator, Secret, SenderIdentity};
/// use formrelay_core::web::{normalize, FormSubmission};
///
/// let rules = FieldRules::default();
/// let key = Secret::new("k".to_string());
/// let submission = FormSubmission::new("name=Jo&_to=a%40x.com").with_source_origin("203.0.113.7");
/// let request = RequestValidator::new(&rules)
///     .verify(normalize(&submission, &rules, &PlaintextOnly, &key))
///     .unwrap();
///
/// let identity = SenderIdentity::new("Form", Some("identity/forms@example.com".to_string()));
/// let message = MessageBuilder::new(&identity, "New submission").build(&request, &rules);
///
/// assert_eq!(message.sender(), "Form <forms@example.com>");
/// assert_eq!(message.body(), "NAME: Jo\r\n");
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
    identity: &'a SenderIdentity,
    subject: String,
    reply_to_override: Option<String>,
}

impl<'a> MessageBuilder<'a> {
    /// Creates a builder sending as `identity` with `subject`.
    pub fn new(identity: &'a SenderIdentity, subject: impl Into<String>) -> Self {
        Self {
            identity,
            subject: subject.into(),
            reply_to_override: None,
        }
    }

    /// Replaces the form-supplied reply-to list with a single address.
    ///
    /// `None` keeps the form-supplied list.
    pub fn reply_to_override(mut self, address: Option<String>) -> Self {
        self.reply_to_override = address;
        self
    }

    /// Builds the envelope.
    pub fn build(&self, request: &Verified<Request>, rules: &FieldRules) -> Message {
        let request = request.as_ref();
        let recipients = request.recipients();

        let reply_to = match &self.reply_to_override {
            Some(address) => vec![address.clone()],
            None => recipients.reply_to.clone(),
        };

        let to = if recipients.to.is_empty() {
            Vec::new()
        } else {
            vec![recipients.to.clone()]
        };

        Message {
            sender: self.identity.compose(),
            reply_to,
            destination: Destination {
                to,
                cc: recipients.cc.clone(),
                bcc: recipients.bcc.clone(),
            },
            subject: self.subject.clone(),
            body: render_body(request, rules),
        }
    }
}

/// One `NAME: value` line per custom field, in submission order.
pub fn render_body(request: &Request, rules: &FieldRules) -> String {
    request
        .fields()
        .iter()
        .filter(|(name, _)| rules.is_custom(name))
        .map(|(name, value)| format!("{}: {}{}", name.to_uppercase(), value, BODY_LINE_END))
        .collect()
}
