use std::sync::OnceLock;

use regex::Regex;

/// Known summary headers, checked in priority order.
pub const ERR_NO_RESPONSE: &str = "no response from provider";
pub const ERR_LOGIN_FAILED: &str = "login failed";
pub const ERR_TOKEN_VERIFICATION: &str = "token verification failed";

const HEADERS: [&str; 3] = [ERR_NO_RESPONSE, ERR_LOGIN_FAILED, ERR_TOKEN_VERIFICATION];
const FALLBACK_SUMMARY: &str = "Login error";

/// A server error split into a short summary and the remaining detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub summary: String,
    pub detail: String,
}

impl ClassifiedError {
    /// True when the message carried no recognizable error block at all.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.detail.is_empty()
    }
}

fn error_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)Errors:.*\* *(.*)").expect("valid error pattern"))
}

/// Split a raw server error message into (summary, detail).
///
/// The text after the `Errors:` marker and its bullet is matched against the
/// known headers; an unrecognized message keeps the generic summary, and a
/// message without the marker yields an all-empty result the caller must
/// replace with its own generic text.
pub fn classify(message: &str) -> ClassifiedError {
    let Some(captures) = error_pattern().captures(message) else {
        return ClassifiedError {
            summary: String::new(),
            detail: String::new(),
        };
    };
    let block = captures.get(1).map(|m| m.as_str()).unwrap_or("");

    let mut summary = FALLBACK_SUMMARY.to_owned();
    let mut detail = String::new();
    for header in HEADERS {
        if let Some(rest) = block.strip_prefix(header) {
            summary = header.to_owned();
            detail = rest
                .trim_start_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
                .trim_end()
                .to_owned();
            break;
        }
    }
    if detail.is_empty() {
        detail = block.to_owned();
    }

    ClassifiedError { summary, detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_header_is_split_from_detail() {
        let parsed = classify("error response from server (status 400). Errors:\n\n* login failed: bad code");
        assert_eq!(parsed.summary, "login failed");
        assert_eq!(parsed.detail, "bad code");
    }

    #[test]
    fn header_priority_spans_newlines() {
        let parsed = classify(
            "Errors:\n\n* no response from provider. gateway timeout\nfrom upstream proxy",
        );
        assert_eq!(parsed.summary, "no response from provider");
        assert_eq!(parsed.detail, "gateway timeout\nfrom upstream proxy");
    }

    #[test]
    fn token_verification_header() {
        let parsed = classify("Errors:\n\n* token verification failed. invalid signature");
        assert_eq!(parsed.summary, "token verification failed");
        assert_eq!(parsed.detail, "invalid signature");
    }

    #[test]
    fn unrecognized_message_keeps_generic_summary() {
        let parsed = classify("Errors: * some unrecognized message");
        assert_eq!(parsed.summary, "Login error");
        assert_eq!(parsed.detail, "some unrecognized message");
    }

    #[test]
    fn missing_marker_yields_empty_pair() {
        let parsed = classify("connection refused");
        assert_eq!(parsed.summary, "");
        assert_eq!(parsed.detail, "");
        assert!(parsed.is_empty());
    }

    #[test]
    fn bare_header_falls_back_to_full_block() {
        let parsed = classify("Errors:\n\n* login failed");
        assert_eq!(parsed.summary, "login failed");
        assert_eq!(parsed.detail, "login failed");
    }

    #[test]
    fn classification_is_pure() {
        let input = "Errors:\n\n* login failed: bad code";
        assert_eq!(classify(input), classify(input));
    }
}
