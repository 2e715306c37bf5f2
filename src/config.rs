//! Relay configuration.
//!
//! The host loads the document however it likes (file, secret store,
//! environment) and hands the text to [`RelayConfig::from_toml`].
//!
//! ```toml
//! key = "…"
//! subject = "New form submission"
//! whitelist = ["owner@example.com"]
//! reply_to = "owner@example.com"
//!
//! [sender]
//! display_name = "Contact form"
//! locator = "arn:aws:ses:eu-west-1:123456789012:identity/forms@example.com"
//!
//! [fields]
//! honeypot = "_gotcha"
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::fields::FieldRules;
use crate::message::SenderIdentity;
use crate::syntax::is_email;
use crate::validate::Whitelist;
use crate::Secret;

/// Errors raised while reading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field is present but unusable.
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was refused.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Everything a [`Relay`](crate::web::Relay) needs besides its cipher and transport.
#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    /// Key handed to the cipher for recipient tokens.
    pub key: Secret<String>,
    /// Optional list of permitted recipients.
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,
    /// Who envelopes are sent as.
    pub sender: SenderIdentity,
    /// Subject line of every envelope.
    pub subject: String,
    /// Fixed reply-to address that replaces the form-supplied list.
    #[serde(default)]
    pub reply_to: Option<String>,
    /// Field names and patterns.
    #[serde(default)]
    pub fields: FieldRules,
}

impl RelayConfig {
    /// Parses and checks a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed documents and
    /// `ConfigError::Invalid` when [`validate`](Self::validate) fails.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would otherwise only fail at send time.
    ///
    /// A missing sender locator produces an envelope whose sender has an
    /// empty address, which the envelope validator always refuses.
    ///
    /// # Errors
    ///
    /// Returns the first unusable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key.expose_secret().is_empty() {
            return Err(ConfigError::invalid("key", "must not be empty"));
        }

        if self.subject.is_empty() {
            return Err(ConfigError::invalid("subject", "must not be empty"));
        }

        if self.sender.address().is_empty() {
            return Err(ConfigError::invalid(
                "sender.locator",
                "must end in the sending address",
            ));
        }

        if let Some(reply_to) = &self.reply_to {
            if !is_email(reply_to) {
                return Err(ConfigError::invalid("reply_to", "must be an email address"));
            }
        }

        if let Some(whitelist) = &self.whitelist {
            if let Some(entry) = whitelist.iter().find(|entry| !is_email(entry)) {
                return Err(ConfigError::invalid(
                    "whitelist",
                    format!("'{}' is not an email address", entry),
                ));
            }
        }

        if self.fields.reserved_prefix.is_empty() {
            return Err(ConfigError::invalid("fields.reserved_prefix", "must not be empty"));
        }

        Ok(())
    }

    /// The whitelist as a lookup set, if one is configured.
    pub fn whitelist(&self) -> Option<Whitelist> {
        self.whitelist
            .as_ref()
            .map(|entries| entries.iter().cloned().collect())
    }
}
