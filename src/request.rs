use std::fmt;

/// Form fields in the order the client sent them.
///
/// A repeated name keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, String)>,
}

impl FormFields {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing the value of an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value of `name` when present and non-empty.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    /// Returns `true` when `name` was submitted.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates `(name, value)` pairs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no fields were submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FormFields::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// Resolved recipient addresses of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients {
    /// Primary recipient, empty when not supplied.
    pub to: String,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Reply-to addresses supplied by the form.
    pub reply_to: Vec<String>,
}

/// The shape of the reply the client asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// An HTML page (default).
    #[default]
    Html,
    /// A JSON document.
    Json,
    /// Any other value of the `format` query parameter.
    Unrecognized(String),
}

impl ResponseFormat {
    /// Parses the `format` query parameter. Matching is exact.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "html" => Self::Html,
            "json" => Self::Json,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns `true` for `html` and `json`.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Json => write!(f, "json"),
            Self::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

/// A normalized form submission.
///
/// Built once by [`normalize`](crate::web::normalize) and never mutated.
/// Nothing about it is trusted until
/// [`RequestValidator::verify`](crate::RequestValidator::verify) wraps it in
/// [`Verified`](crate::Verified).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    fields: FormFields,
    recipients: Recipients,
    response_format: ResponseFormat,
    redirect_url: Option<String>,
    anti_automation_token: Option<String>,
    source_origin: String,
}

impl Request {
    pub(crate) fn new(
        fields: FormFields,
        recipients: Recipients,
        response_format: ResponseFormat,
        redirect_url: Option<String>,
        anti_automation_token: Option<String>,
        source_origin: String,
    ) -> Self {
        Self {
            fields,
            recipients,
            response_format,
            redirect_url,
            anti_automation_token,
            source_origin,
        }
    }

    /// All submitted fields, reserved ones included.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Resolved recipients.
    pub fn recipients(&self) -> &Recipients {
        &self.recipients
    }

    /// Requested reply format.
    pub fn response_format(&self) -> &ResponseFormat {
        &self.response_format
    }

    /// Post-submit redirect target, unvalidated until verified.
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    /// The anti-automation challenge response.
    pub fn anti_automation_token(&self) -> Option<&str> {
        self.anti_automation_token.as_deref()
    }

    /// The client's network origin as reported by the transport layer.
    pub fn source_origin(&self) -> &str {
        &self.source_origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_fields_keep_order_and_last_value() {
        let fields: FormFields = [("b", "1"), ("a", "2"), ("b", "3")].into_iter().collect();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec![("b", "3"), ("a", "2")]);
    }

    #[test]
    fn get_non_empty_skips_blank_values() {
        let fields: FormFields = [("_cc", ""), ("name", "Jo")].into_iter().collect();

        assert!(fields.contains("_cc"));
        assert_eq!(fields.get_non_empty("_cc"), None);
        assert_eq!(fields.get_non_empty("name"), Some("Jo"));
    }

    #[test]
    fn response_format_parse_is_exact() {
        assert_eq!(ResponseFormat::parse("html"), ResponseFormat::Html);
        assert_eq!(ResponseFormat::parse("json"), ResponseFormat::Json);
        assert_eq!(
            ResponseFormat::parse("JSON"),
            ResponseFormat::Unrecognized("JSON".to_string())
        );
        assert!(!ResponseFormat::parse("xml").is_recognized());
        assert_eq!(ResponseFormat::default(), ResponseFormat::Html);
    }
}
