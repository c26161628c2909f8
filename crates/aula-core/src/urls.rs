//! Reference shape helpers shared by the resolver and the storage backends.

/// Schemes that address content without an authority (`data:...`, `blob:...`).
const OPAQUE_SCHEMES: &[&str] = &["data", "blob"];

/// Whether `value` is already an absolute URL: an RFC 3986 scheme followed by
/// `//` (`https://...`), one of the opaque schemes `data:` and `blob:`, or a
/// protocol-relative `//host/...`.
///
/// Any other `word:` prefix is part of a filename (`foto:1.png`). Single-letter
/// schemes are rejected so Windows drive paths are not mistaken for URLs.
pub fn is_absolute_url(value: &str) -> bool {
    let value = value.trim();
    if value.starts_with("//") {
        return true;
    }

    match value.split_once(':') {
        Some((scheme, rest)) if scheme.len() > 1 => {
            let mut chars = scheme.chars();
            let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            valid
                && (rest.starts_with("//")
                    || OPAQUE_SCHEMES
                        .iter()
                        .any(|opaque| scheme.eq_ignore_ascii_case(opaque)))
        }
        _ => false,
    }
}

/// `url` without its scheme, so http and https forms of the same address compare equal.
pub fn without_scheme(url: &str) -> &str {
    if let Some(rest) = url.strip_prefix("//") {
        rest
    } else if let Some((_, rest)) = url.split_once("://") {
        rest
    } else {
        url
    }
}

/// `url` without query string and fragment.
pub fn without_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or_default()
}
