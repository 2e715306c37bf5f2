//! Structural assembly of a [`Request`] from a raw submission.

use url::form_urlencoded;

use crate::address::{resolve, resolve_list};
use crate::cipher::AddressCipher;
use crate::fields::FieldRules;
use crate::request::{FormFields, Recipients, Request, ResponseFormat};
use crate::Secret;

use super::{FormSubmission, RequestContext};

/// Query parameter selecting the reply format.
pub const FORMAT_PARAM: &str = "format";

/// Parses and resolves a submission into a [`Request`].
///
/// Recipient fields are resolved through `cipher` when present and
/// non-empty; everything else is copied. No rule is checked here.
///
/// # Examples
///
/// ```
/// use formrelay_core::{FieldRules, PlaintextOnly, ResponseFormat, Secret};
/// use formrelay_core::web::{normalize, FormSubmission};
///
/// let submission = FormSubmission::new("_to=a%40x.com&_cc=b%40x.com%3Bc%40x.com&name=Jo")
///     .with_query("format=json")
///     .with_source_origin("203.0.113.7");
/// let key = Secret::new("k".to_string());
///
/// let request = normalize(&submission, &FieldRules::default(), &PlaintextOnly, &key);
/// assert_eq!(request.recipients().to, "a@x.com");
/// assert_eq!(request.recipients().cc, vec!["b@x.com", "c@x.com"]);
/// assert_eq!(request.response_format(), &ResponseFormat::Json);
/// ```
pub fn normalize<C: AddressCipher>(
    submission: &FormSubmission,
    rules: &FieldRules,
    cipher: &C,
    key: &Secret<String>,
) -> Request {
    let fields = parse_fields(submission.body().peek());
    let query = parse_fields(submission.query().peek());

    let recipients = Recipients {
        to: fields
            .get_non_empty(&rules.to)
            .map(|raw| resolve(raw, cipher, key))
            .unwrap_or_default(),
        cc: resolve_field(&fields, &rules.cc, cipher, key),
        bcc: resolve_field(&fields, &rules.bcc, cipher, key),
        reply_to: resolve_field(&fields, &rules.reply_to, cipher, key),
    };

    let response_format = query
        .get(FORMAT_PARAM)
        .map(ResponseFormat::parse)
        .unwrap_or_default();

    let redirect_url = fields.get(&rules.redirect).map(str::to_string);

    let anti_automation_token = rules
        .token_fields
        .iter()
        .find_map(|name| fields.get(name))
        .map(str::to_string);

    let source_origin = submission.source_origin().unwrap_or_default().to_string();

    Request::new(
        fields,
        recipients,
        response_format,
        redirect_url,
        anti_automation_token,
        source_origin,
    )
}

fn parse_fields(raw: &str) -> FormFields {
    form_urlencoded::parse(raw.as_bytes())
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

fn resolve_field<C: AddressCipher>(
    fields: &FormFields,
    name: &str,
    cipher: &C,
    key: &Secret<String>,
) -> Vec<String> {
    fields
        .get_non_empty(name)
        .map(|raw| resolve_list(raw, cipher, key))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::XorHexCipher;
    use crate::PlaintextOnly;

    fn key() -> Secret<String> {
        Secret::new("relay-key".to_string())
    }

    fn run(submission: &FormSubmission) -> Request {
        normalize(submission, &FieldRules::default(), &PlaintextOnly, &key())
    }

    #[test]
    fn defaults_when_nothing_supplied() {
        let request = run(&FormSubmission::new(""));

        assert!(request.fields().is_empty());
        assert_eq!(request.recipients(), &Recipients::default());
        assert_eq!(request.response_format(), &ResponseFormat::Html);
        assert_eq!(request.redirect_url(), None);
        assert_eq!(request.anti_automation_token(), None);
        assert_eq!(request.source_origin(), "");
    }

    #[test]
    fn decodes_body_in_order() {
        let request = run(&FormSubmission::new("message=Hello+there%21&name=J%C3%B6"));

        assert_eq!(
            request.fields().iter().collect::<Vec<_>>(),
            vec![("message", "Hello there!"), ("name", "Jö")]
        );
    }

    #[test]
    fn resolves_encrypted_recipients() {
        let to = XorHexCipher::encrypt("owner@x.com", &key());
        let bcc = XorHexCipher::encrypt("audit@x.com", &key());
        let body = format!("_to={to}&_bcc=plain%40x.com%3B{bcc}&name=Jo");

        let request = normalize(
            &FormSubmission::new(body),
            &FieldRules::default(),
            &XorHexCipher,
            &key(),
        );

        assert_eq!(request.recipients().to, "owner@x.com");
        assert_eq!(request.recipients().bcc, vec!["plain@x.com", "audit@x.com"]);
        // The raw field keeps the token.
        assert_eq!(request.fields().get("_to"), Some(to.as_str()));
    }

    #[test]
    fn empty_list_field_is_not_resolved() {
        let request = run(&FormSubmission::new("_cc=&_replyTo=r%40x.com"));

        assert!(request.recipients().cc.is_empty());
        assert_eq!(request.recipients().reply_to, vec!["r@x.com"]);
    }

    #[test]
    fn format_read_from_query_only() {
        let request = run(&FormSubmission::new("format=json").with_query("format=xml"));
        assert_eq!(
            request.response_format(),
            &ResponseFormat::Unrecognized("xml".to_string())
        );
    }

    #[test]
    fn token_field_first_match_wins() {
        let request = run(&FormSubmission::new(
            "g-recaptcha-response=second&_recaptcha=first",
        ));
        assert_eq!(request.anti_automation_token(), Some("first"));

        let request = run(&FormSubmission::new("g-recaptcha-response=only"));
        assert_eq!(request.anti_automation_token(), Some("only"));
    }

    #[test]
    fn redirect_and_origin_copied_verbatim() {
        let request = run(
            &FormSubmission::new("_redirect=not+a+url").with_source_origin("2001:db8::1"),
        );

        assert_eq!(request.redirect_url(), Some("not a url"));
        assert_eq!(request.source_origin(), "2001:db8::1");
    }
}
