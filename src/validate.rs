use std::collections::HashSet;

use crate::error::Rejection;
use crate::fields::FieldRules;
use crate::request::Request;
use crate::syntax::{is_email, is_website};
use crate::Verified;

/// Addresses that recipient fields are confined to, when enforced.
///
/// Membership is exact: addresses are compared as submitted (or decrypted),
/// without case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    addresses: HashSet<String>,
}

impl Whitelist {
    /// Returns `true` when `address` is permitted.
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    /// Number of permitted addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns `true` when nothing is permitted.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            addresses: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One step of the request rule chain.
///
/// Rules run in declaration order and the first failure is the only one
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRule {
    /// The honeypot field must be absent or empty.
    Honeypot,
    /// The response format must be `html` or `json`.
    ResponseFormat,
    /// The primary recipient must be present.
    PrimaryPresent,
    /// The primary recipient must be a valid, permitted address.
    PrimaryAddress,
    /// Every supplied list recipient must be a valid, permitted address.
    ListAddresses,
    /// The redirect target must be a website URL.
    Redirect,
    /// At least one custom field must be present.
    CustomContent,
    /// The transport layer must have reported the client origin.
    SourceOrigin,
}

impl RequestRule {
    /// Every rule, in evaluation order.
    pub const ORDER: [RequestRule; 8] = [
        RequestRule::Honeypot,
        RequestRule::ResponseFormat,
        RequestRule::PrimaryPresent,
        RequestRule::PrimaryAddress,
        RequestRule::ListAddresses,
        RequestRule::Redirect,
        RequestRule::CustomContent,
        RequestRule::SourceOrigin,
    ];
}

/// Runs the request rule chain.
///
/// # Examples
///
/// ```
/// use formrelay_core::{FieldRules, RequestValidator, RejectionKind, Whitelist};
/// use formrelay_core::web::{normalize, FormSubmission};
/// use formrelay_core::{PlaintextOnly, Secret};
///
/// let rules = FieldRules::default();
/// let key = Secret::new("k".to_string());
/// let submission = FormSubmission::new("_to=b%40x.com&name=Jo").with_source_origin("203.0.113.7");
/// let request = normalize(&submission, &rules, &PlaintextOnly, &key);
///
/// let whitelist: Whitelist = ["a@x.com"].into_iter().collect();
/// let rejection = RequestValidator::new(&rules)
///     .with_whitelist(Some(&whitelist))
///     .validate(&request)
///     .unwrap_err();
///
/// assert_eq!(rejection.kind(), RejectionKind::UnprocessableInput);
/// assert_eq!(rejection.message(), "Non-whitelisted '_to' recipient");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestValidator<'a> {
    rules: &'a FieldRules,
    whitelist: Option<&'a Whitelist>,
}

impl<'a> RequestValidator<'a> {
    /// Creates a validator without a whitelist.
    pub fn new(rules: &'a FieldRules) -> Self {
        Self {
            rules,
            whitelist: None,
        }
    }

    /// Confines recipients to `whitelist` when one is given.
    pub fn with_whitelist(mut self, whitelist: Option<&'a Whitelist>) -> Self {
        self.whitelist = whitelist;
        self
    }

    /// Checks `request` against every rule, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the `Rejection` describing the first violated rule.
    pub fn validate(&self, request: &Request) -> Result<(), Rejection> {
        for rule in RequestRule::ORDER {
            self.validate_one(rule, request)?;
        }
        Ok(())
    }

    /// Validates `request` and wraps it as proof for the message builder.
    ///
    /// # Errors
    ///
    /// Returns the `Rejection` describing the first violated rule.
    pub fn verify(&self, request: Request) -> Result<Verified<Request>, Rejection> {
        self.validate(&request)?;
        Ok(Verified::new_unchecked(request))
    }

    fn validate_one(&self, rule: RequestRule, request: &Request) -> Result<(), Rejection> {
        let fields = request.fields();
        let recipients = request.recipients();

        match rule {
            RequestRule::Honeypot => {
                if fields.get_non_empty(&self.rules.honeypot).is_some() {
                    return Err(Rejection::forbidden("Honeypot field was filled in"));
                }
            }
            RequestRule::ResponseFormat => {
                if !request.response_format().is_recognized() {
                    return Err(Rejection::unprocessable(
                        "Invalid response format, expected 'html' or 'json'",
                    ));
                }
            }
            RequestRule::PrimaryPresent => {
                if recipients.to.is_empty() {
                    return Err(Rejection::unprocessable(format!(
                        "Invalid '{}' recipient",
                        self.rules.to
                    )));
                }
            }
            RequestRule::PrimaryAddress => {
                if fields.contains(&self.rules.to) {
                    self.check_group(&self.rules.to, std::slice::from_ref(&recipients.to))?;
                }
            }
            RequestRule::ListAddresses => {
                let lists = [&recipients.cc, &recipients.bcc, &recipients.reply_to];
                for (name, addresses) in self.rules.list_fields().into_iter().zip(lists) {
                    if fields.get_non_empty(name).is_some() {
                        self.check_group(name, addresses)?;
                    }
                }
            }
            RequestRule::Redirect => {
                if let Some(url) = request.redirect_url() {
                    if !is_website(url) {
                        return Err(Rejection::unprocessable(format!(
                            "Invalid website URL in '{}'",
                            self.rules.redirect
                        )));
                    }
                }
            }
            RequestRule::CustomContent => {
                if !fields.iter().any(|(name, _)| self.rules.is_custom(name)) {
                    return Err(Rejection::unprocessable(
                        "Expected at least one custom field",
                    ));
                }
            }
            RequestRule::SourceOrigin => {
                if request.source_origin().is_empty() {
                    return Err(Rejection::malformed_origin(
                        "Missing source network origin",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Syntax-checks every address of a field, then whitelists every address.
    fn check_group(&self, field: &str, addresses: &[String]) -> Result<(), Rejection> {
        if addresses.iter().any(|address| !is_email(address)) {
            return Err(Rejection::unprocessable(format!(
                "Invalid '{}' recipient",
                field
            )));
        }

        if let Some(whitelist) = self.whitelist {
            if addresses.iter().any(|address| !whitelist.contains(address)) {
                return Err(Rejection::unprocessable(format!(
                    "Non-whitelisted '{}' recipient",
                    field
                )));
            }
        }
        Ok(())
    }
}
