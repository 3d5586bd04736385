//! Default security response headers.
//!
//! Applied with `SetResponseHeaderLayer::if_not_present`, so a handler that
//! sets one of these headers itself keeps its own value. Names must be
//! lowercase.

pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue};

    use super::*;

    #[test]
    fn headers_are_valid_and_unique() {
        let mut names = Vec::new();
        for (name, value) in SECURITY_HEADERS {
            assert!(HeaderName::from_bytes(name.as_bytes()).is_ok(), "{name}");
            assert_eq!(*name, name.to_ascii_lowercase());
            assert!(HeaderValue::from_str(value).is_ok(), "{value}");
            names.push(*name);
        }
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SECURITY_HEADERS.len());
    }

    #[test]
    fn includes_clickjacking_and_sniffing_protection() {
        let get = |name: &str| {
            SECURITY_HEADERS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| *v)
        };
        assert_eq!(get("x-frame-options"), Some("SAMEORIGIN"));
        assert_eq!(get("x-content-type-options"), Some("nosniff"));
        assert_eq!(get("x-dns-prefetch-control"), Some("off"));
        assert_eq!(get("x-download-options"), Some("noopen"));
    }
}
