use regex::Regex;
use std::sync::LazyLock;

const MAX_GREETING_LENGTH: usize = 40;

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:
            (?:hi|hii|hello|hey|heya|hiya|howdy|greetings|yo|hola|hallo|
               good\s+(?:morning|afternoon|evening|day))
            (?:[\s,]+\p{L}[\p{L}'-]*)?
            [\s!.,]*
        )+$",
    )
    .expect("greeting pattern is valid")
});

/// Returns true for short stand-alone greetings ("hi", "Hello there!",
/// "good morning", "hey Sam!"). A greeting word may be followed by one
/// addressee word such as the bot's name; a greeting followed by an actual
/// question is not a greeting.
pub fn is_greeting(message: &str) -> bool {
    let trimmed = message.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_GREETING_LENGTH {
        return false;
    }
    GREETING.is_match(trimmed)
}
