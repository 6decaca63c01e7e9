use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 5] = ["password", "secret", "token", "bearer", "authorization"];

/// Replaces every whitespace-separated chunk that looks like a credential.
pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "pdesk panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("pdesk panic: {}", scrubbed);
        }
    }));
}

fn redact_chunk(chunk: &str) -> String {
    let lowered = chunk.to_ascii_lowercase();
    if SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        || looks_like_jwt(chunk)
        || looks_like_opaque_token(chunk)
    {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

/// Three base64url segments joined by dots.
fn looks_like_jwt(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| ch == '"' || ch == '\'' || ch == ',');
    let segments: Vec<&str> = cleaned.split('.').collect();

    segments.len() == 3
        && segments.iter().all(|segment| {
            segment.len() >= 4
                && segment
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        })
}

fn looks_like_opaque_token(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());

    let has_mixed = cleaned.chars().any(|ch| ch.is_ascii_alphabetic())
        && cleaned.chars().any(|ch| ch.is_ascii_digit());

    cleaned.len() >= 24 && has_mixed && cleaned.chars().all(|ch| ch.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_text_scrubs_credentials() {
        let input = "login failed password=hunter2 Bearer eyJhbGciOi.eyJzdWIiOjF9.c2lnbmF0dXJl";
        let output = redact_text(input);

        assert!(!output.contains("hunter2"));
        assert!(!output.contains("eyJzdWIiOjF9"));
        assert!(output.contains("[REDACTED]"));
        assert!(output.starts_with("login failed"));
    }

    #[test]
    fn redact_text_keeps_ordinary_words_and_ids() {
        let input = "booking 42 accepted at 10:30";

        assert_eq!(redact_text(input), input);
    }

    #[test]
    fn long_mixed_tokens_are_scrubbed() {
        let output = redact_text("session a1b2c3d4e5f6a7b8c9d0e1f2a3b4");

        assert_eq!(output, "session [REDACTED]");
    }
}
