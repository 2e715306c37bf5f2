//! Syntax predicates for addresses and redirect targets.
//!
//! These are the only discriminators the pipeline uses to decide whether a
//! recipient value is a plaintext address or an encrypted token, and whether
//! a redirect target is acceptable.

use url::Url;

const MAX_LOCAL_PART: usize = 64;
const MAX_DOMAIN: usize = 255;

/// Returns `true` when `input` is a bare `local@domain` address.
///
/// The local part must be a dot-atom, the domain a dotted hostname with at
/// least two labels. Display names, angle brackets, quoted local parts and
/// address literals are rejected.
///
/// # Examples
///
/// ```
/// use formrelay_core::syntax::is_email;
///
/// assert!(is_email("a@x.com"));
/// assert!(is_email("first.last+tag@mail.example.org"));
/// assert!(!is_email("not-an-email"));
/// assert!(!is_email("a@localhost"));
/// ```
pub fn is_email(input: &str) -> bool {
    let Some((local, domain)) = input.rsplit_once('@') else {
        return false;
    };

    is_dot_atom(local) && is_hostname(domain)
}

/// Returns `true` when `input` is an absolute `http` or `https` URL with a host.
///
/// The input is checked as given. `Url::parse` drops tabs and newlines
/// before parsing, so any control character or whitespace is refused up
/// front; the raw value ends up in a `Location` header.
///
/// # Examples
///
/// ```
/// use formrelay_core::syntax::is_website;
///
/// assert!(is_website("https://example.com/thanks"));
/// assert!(!is_website("not a url"));
/// assert!(!is_website("javascript:alert(1)"));
/// assert!(!is_website("https://example.com/\r\nSet-Cookie: x=1"));
/// ```
pub fn is_website(input: &str) -> bool {
    if input.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }

    match Url::parse(input) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn is_dot_atom(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_PART {
        return false;
    }

    local
        .split('.')
        .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_hostname(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    // The top-level label must not be numeric.
    if labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
    {
        return false;
    }

    labels.iter().all(|label| is_label(label))
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

const fn is_atext(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}
