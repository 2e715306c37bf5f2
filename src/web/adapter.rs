//! The untrusted submission as it crosses the HTTP boundary.

use crate::Tainted;

use super::RequestContext;

/// A raw form submission: URL-encoded body, query string and caller origin.
///
/// The body and query are wrapped in [`Tainted`] on construction and only
/// [`normalize`](super::normalize) reads them.
///
/// # Examples
///
/// ```
/// use formrelay_core::web::{FormSubmission, RequestContext};
///
/// let submission = FormSubmission::new("name=Jo&_to=a%40x.com")
///     .with_query("format=json")
///     .with_source_origin("203.0.113.7");
///
/// assert_eq!(submission.source_origin(), Some("203.0.113.7"));
/// ```
#[derive(Debug, Clone)]
pub struct FormSubmission {
    body: Tainted<String>,
    query: Tainted<String>,
    source_origin: Option<String>,
}

impl FormSubmission {
    /// Wraps a URL-encoded body. The query string starts empty and the
    /// origin unknown.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Tainted::new(body.into()),
            query: Tainted::new(String::new()),
            source_origin: None,
        }
    }

    /// Sets the raw query string, without the leading `?`.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Tainted::new(query.into());
        self
    }

    /// Sets the caller's network origin. An empty origin counts as unknown.
    pub fn with_source_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.source_origin = (!origin.is_empty()).then_some(origin);
        self
    }

    pub(crate) fn body(&self) -> &Tainted<String> {
        &self.body
    }

    pub(crate) fn query(&self) -> &Tainted<String> {
        &self.query
    }
}

impl RequestContext for FormSubmission {
    fn source_origin(&self) -> Option<&str> {
        self.source_origin.as_deref()
    }
}
