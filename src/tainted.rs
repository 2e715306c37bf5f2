use std::fmt;

/// Raw input from the client that has not been normalized yet.
///
/// The URL-encoded body and query string of a submission arrive as
/// `Tainted<String>`. Nothing outside this crate can read the inner value;
/// the only way to get at the fields is to run the submission through
/// [`normalize`](crate::web::normalize), which parses it into a
/// [`Request`](crate::Request) that the validator then checks.
///
/// # Examples
///
/// ```
/// use formrelay_core::Tainted;
///
/// let body = Tainted::new("_to=a%40x.com&name=Jo".to_string());
/// assert!(format!("{:?}", body).contains("Tainted"));
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Must stay private: the normalizer is the only reader.
    inner: T,
}

impl<T> Tainted<T> {
    /// Wraps an untrusted value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the raw value for parsing.
    pub(crate) fn peek(&self) -> &T {
        &self.inner
    }
}

// No Deref, AsRef, Borrow or From impls: they would let raw client input
// skip normalization.

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tainted")
            .field("inner", &self.inner)
            .finish()
    }
}
