use std::sync::LazyLock;

use regex::Regex;

const MAX_VISIBLE_CHARS: usize = 100;

static SECRETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(bearer\s+|api[_-]?key=|password=|secret=|token=)[^\s&"']+|\bsk-[A-Za-z0-9_-]{8,}"#)
        .unwrap()
});

/// Visitor text made safe for logs: truncated on a character boundary with
/// credentials redacted.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let cut: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{cut}... ({total_chars} chars total)")
    } else {
        trimmed.to_string()
    };

    SECRETS
        .replace_all(&visible, |caps: &regex::Captures| match caps.get(1) {
            Some(prefix) => format!("{}[REDACTED]", prefix.as_str()),
            None => "[REDACTED]".to_string(),
        })
        .into_owned()
}
