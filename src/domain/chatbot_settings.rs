pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;
/// Largest completion budget a chatbot may request; fits a Postgres INTEGER.
pub const MAX_COMPLETION_TOKENS: u32 = i32::MAX as u32;

/// Per-chatbot generation settings. `None` means "use the service default".
#[derive(Debug, Clone, PartialEq)]
pub struct ChatbotSettings {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub custom_prompt: Option<String>,
    pub welcome_message: Option<String>,
    pub format_markdown: bool,
    pub use_history: bool,
}

impl Default for ChatbotSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: None,
            max_tokens: None,
            custom_prompt: None,
            welcome_message: None,
            format_markdown: true,
            use_history: true,
        }
    }
}

/// Fully resolved parameters for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatbotSettings {
    pub fn resolve(&self, defaults: &ModelParameters) -> ModelParameters {
        let model = self
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| defaults.model.clone());

        let temperature = self
            .temperature
            .filter(|t| t.is_finite())
            .unwrap_or(defaults.temperature)
            .clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);

        let max_tokens = self
            .max_tokens
            .filter(|t| *t > 0)
            .unwrap_or(defaults.max_tokens);

        ModelParameters {
            model,
            temperature,
            max_tokens,
        }
    }
}
