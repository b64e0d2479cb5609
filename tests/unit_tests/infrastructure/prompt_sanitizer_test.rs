use chatforge::infrastructure::observability::sanitize_prompt;

#[test]
fn given_blank_prompt_when_sanitizing_then_marks_it_empty() {
    assert_eq!(sanitize_prompt("   "), "[EMPTY]");
}

#[test]
fn given_short_prompt_when_sanitizing_then_returns_it_trimmed() {
    assert_eq!(sanitize_prompt("  What are your hours?  "), "What are your hours?");
}

#[test]
fn given_long_prompt_when_sanitizing_then_truncates_with_total_length() {
    let prompt = "a".repeat(150);

    let sanitized = sanitize_prompt(&prompt);

    assert!(sanitized.starts_with(&"a".repeat(100)));
    assert!(sanitized.ends_with("... (150 chars total)"));
}

#[test]
fn given_multibyte_text_past_limit_when_sanitizing_then_cuts_on_char_boundary() {
    let prompt = "ø".repeat(120);

    let sanitized = sanitize_prompt(&prompt);

    assert!(sanitized.starts_with(&"ø".repeat(100)));
    assert!(sanitized.contains("(120 chars total)"));
}

#[test]
fn given_credentials_in_prompt_when_sanitizing_then_they_are_redacted() {
    let sanitized =
        sanitize_prompt("my key is sk-abcdefghijklmnop and Bearer eyJhbGciOi, password=hunter2");

    assert!(!sanitized.contains("sk-abcdefghijklmnop"));
    assert!(!sanitized.contains("eyJhbGciOi"));
    assert!(!sanitized.contains("hunter2"));
    assert!(sanitized.contains("Bearer [REDACTED]"));
    assert!(sanitized.contains("password=[REDACTED]"));
}
