/// Proof that a value passed its validator.
///
/// `Verified<T>` is only produced by
/// [`RequestValidator::verify`](crate::RequestValidator::verify) and
/// [`envelope::verify`](crate::envelope::verify). The message builder takes
/// a `&Verified<Request>` and the transport takes a `&Verified<Message>`, so
/// skipping a validation step is a compile error rather than a runtime bug.
///
/// # Construction Invariants
///
/// There is no public constructor and no `From<T>` impl.
///
/// ```compile_fail
/// use formrelay_core::Verified;
///
/// let verified = Verified::new("data".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Wraps a value that the caller has just validated.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
