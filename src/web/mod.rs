//! Web boundary: from a raw HTTP form post to a reply.
//!
//! This module contains no framework-specific code. A host integration:
//! 1. Builds a [`FormSubmission`] from its request (or implements
//!    [`ExtractSubmission`] for its request type)
//! 2. Hands it to [`Relay::handle`]
//! 3. Turns the returned [`Reply`] into its own response type
//!
//! The body and query string stay [`Tainted`](crate::Tainted) until
//! [`normalize`] parses them.
//!
//! # Example Flow
//!
//! ```ignore
//! // In a framework-specific integration (e.g. a Lambda handler):
//! let submission = FormSubmission::new(event.body)
//!     .with_query(event.raw_query_string)
//!     .with_source_origin(event.request_context.source_ip);
//!
//! let reply = relay.handle(&submission);
//! respond(reply.status, reply.location, reply.content_type, reply.body)
//! ```

mod adapter;
mod extract;
mod handler;
mod normalize;

pub use adapter::FormSubmission;
pub use extract::{ExtractSubmission, RequestContext};
pub use handler::{Delivery, Relay, Reply};
pub use normalize::{normalize, FORMAT_PARAM};
