//! Extraction boundary traits for web integration.

use super::FormSubmission;

/// What the transport layer knows about the caller.
///
/// Hosts that sit behind a gateway or load balancer implement this over
/// their own request context type.
///
/// # Examples
///
/// ```
/// use formrelay_core::web::RequestContext;
///
/// struct GatewayContext {
///     source_ip: Option<String>,
/// }
///
/// impl RequestContext for GatewayContext {
///     fn source_origin(&self) -> Option<&str> {
///         self.source_ip.as_deref()
///     }
/// }
///
/// let ctx = GatewayContext { source_ip: Some("203.0.113.7".to_string()) };
/// assert_eq!(ctx.source_origin(), Some("203.0.113.7"));
/// ```
pub trait RequestContext {
    /// The client's network origin, if the transport reported one.
    fn source_origin(&self) -> Option<&str>;
}

/// Converts a framework-specific request into a [`FormSubmission`].
///
/// Implementations copy the raw body and query string without decoding
/// them; decoding belongs to [`normalize`](super::normalize).
///
/// # Examples
///
/// ```
/// use formrelay_core::web::{ExtractSubmission, FormSubmission};
///
/// struct LambdaEvent {
///     body: String,
///     raw_query: String,
///     source_ip: String,
/// }
///
/// impl ExtractSubmission for LambdaEvent {
///     fn extract_submission(&self) -> FormSubmission {
///         FormSubmission::new(self.body.clone())
///             .with_query(self.raw_query.clone())
///             .with_source_origin(self.source_ip.clone())
///     }
/// }
/// ```
pub trait ExtractSubmission {
    /// Extracts the untrusted submission.
    fn extract_submission(&self) -> FormSubmission;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestEvent {
        body: &'static str,
        ip: Option<&'static str>,
    }

    impl ExtractSubmission for TestEvent {
        fn extract_submission(&self) -> FormSubmission {
            let submission = FormSubmission::new(self.body);
            match self.ip {
                Some(ip) => submission.with_source_origin(ip),
                None => submission,
            }
        }
    }

    #[test]
    fn extraction_carries_origin() {
        let event = TestEvent {
            body: "name=Jo",
            ip: Some("192.0.2.1"),
        };

        assert_eq!(event.extract_submission().source_origin(), Some("192.0.2.1"));
    }

    #[test]
    fn extraction_without_origin() {
        let event = TestEvent {
            body: "name=Jo",
            ip: None,
        };

        assert_eq!(event.extract_submission().source_origin(), None);
    }
}
