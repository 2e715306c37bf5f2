//! Field classification: which form fields drive the relay and which are content.
//!
//! Every field name the relay reacts to lives in [`FieldRules`]. The
//! validator and the message builder share the same predicates, so a field
//! counted as custom content by one is always emitted by the other.

use serde::Deserialize;

/// Names and patterns used to classify submitted form fields.
///
/// The defaults match the public form contract: reserved fields start with
/// `_`, and any field whose name contains `recaptcha` (case-insensitively)
/// belongs to the anti-automation challenge.
///
/// # Examples
///
/// ```
/// use formrelay_core::FieldRules;
///
/// let rules = FieldRules::default();
/// assert!(rules.is_reserved("_to"));
/// assert!(rules.is_anti_automation_field("g-recaptcha-response"));
/// assert!(rules.is_custom("message"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FieldRules {
    /// Prefix marking a field as reserved for the relay.
    pub reserved_prefix: String,
    /// Lowercase substring marking an anti-automation field.
    pub anti_automation_marker: String,
    /// The single primary recipient field.
    pub to: String,
    /// The `;`-delimited carbon-copy field.
    pub cc: String,
    /// The `;`-delimited blind carbon-copy field.
    pub bcc: String,
    /// The `;`-delimited reply-to field.
    pub reply_to: String,
    /// Hidden field real users never fill.
    pub honeypot: String,
    /// Post-submit redirect target.
    pub redirect: String,
    /// Fields carrying the anti-automation token, in lookup order.
    pub token_fields: Vec<String>,
}

impl Default for FieldRules {
    fn default() -> Self {
        Self {
            reserved_prefix: "_".to_string(),
            anti_automation_marker: "recaptcha".to_string(),
            to: "_to".to_string(),
            cc: "_cc".to_string(),
            bcc: "_bcc".to_string(),
            reply_to: "_replyTo".to_string(),
            honeypot: "_honeypot".to_string(),
            redirect: "_redirect".to_string(),
            token_fields: vec!["_recaptcha".to_string(), "g-recaptcha-response".to_string()],
        }
    }
}

impl FieldRules {
    /// Returns `true` when `name` starts with the reserved prefix.
    pub fn is_reserved(&self, name: &str) -> bool {
        name.starts_with(&self.reserved_prefix)
    }

    /// Returns `true` when the lowercase `name` contains the anti-automation marker.
    pub fn is_anti_automation_field(&self, name: &str) -> bool {
        name.to_lowercase()
            .contains(&self.anti_automation_marker.to_lowercase())
    }

    /// Returns `true` for fields that are copied into the message body.
    pub fn is_custom(&self, name: &str) -> bool {
        !self.is_reserved(name) && !self.is_anti_automation_field(name)
    }

    /// The three list fields, in validation order.
    pub fn list_fields(&self) -> [&str; 3] {
        [&self.cc, &self.bcc, &self.reply_to]
    }
}
