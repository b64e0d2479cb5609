use crate::application::ports::{PromptMessage, SearchResult};
use crate::domain::{Message, MessageRole};

use super::token_counter::count_tokens;

const BASE_INSTRUCTIONS: &str = "You are {name}, a customer-facing assistant embedded on a website. \
Answer the visitor's question using the context provided below. \
If the context does not contain the answer, say that you do not have that information \
and suggest contacting the team directly. Do not invent facts, prices, or policies. \
Keep answers concise and use markdown lists or headings only when they help readability.";

const NO_CONTEXT_INSTRUCTIONS: &str = "No training content matched this question. \
If it is a general conversational question, answer briefly; \
otherwise tell the visitor you do not have that information.";

const GREETING_INSTRUCTIONS: &str = "The visitor just greeted you. \
Reply with one short, friendly greeting and ask how you can help. Do not list capabilities.";

/// Assembles chat-completion messages from chatbot configuration, retrieved
/// context and session history.
pub struct PromptBuilder<'a> {
    chatbot_name: &'a str,
    custom_prompt: Option<&'a str>,
    welcome_message: Option<&'a str>,
    max_context_tokens: usize,
}

/// Prompt plus the retrieval hits that actually fit in the context budget.
pub struct AssembledPrompt {
    pub messages: Vec<PromptMessage>,
    pub used_context: Vec<SearchResult>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(chatbot_name: &'a str, max_context_tokens: usize) -> Self {
        Self {
            chatbot_name,
            custom_prompt: None,
            welcome_message: None,
            max_context_tokens,
        }
    }

    pub fn custom_prompt(mut self, custom_prompt: Option<&'a str>) -> Self {
        self.custom_prompt = custom_prompt.map(str::trim).filter(|p| !p.is_empty());
        self
    }

    pub fn welcome_message(mut self, welcome_message: Option<&'a str>) -> Self {
        self.welcome_message = welcome_message.map(str::trim).filter(|m| !m.is_empty());
        self
    }

    pub fn build(
        &self,
        context: Vec<SearchResult>,
        history: &[Message],
        user_message: &str,
        is_greeting: bool,
    ) -> AssembledPrompt {
        let mut system = BASE_INSTRUCTIONS.replace("{name}", self.chatbot_name);

        if let Some(custom) = self.custom_prompt {
            system.push_str("\n\nAdditional instructions from the chatbot owner:\n");
            system.push_str(custom);
        }

        let used_context = if is_greeting {
            system.push_str("\n\n");
            system.push_str(GREETING_INSTRUCTIONS);
            if let Some(welcome) = self.welcome_message {
                system.push_str(" You may reuse this welcome message: ");
                system.push_str(welcome);
            }
            Vec::new()
        } else {
            let fitted = self.fit_context(context);
            if fitted.is_empty() {
                system.push_str("\n\n");
                system.push_str(NO_CONTEXT_INSTRUCTIONS);
            } else {
                system.push_str("\n\nContext:\n");
                system.push_str(&render_context(&fitted));
            }
            fitted
        };

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(PromptMessage::system(system));
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .map(|m| PromptMessage {
                    role: m.role,
                    content: m.content.clone(),
                }),
        );
        messages.push(PromptMessage::user(user_message.trim()));

        AssembledPrompt {
            messages,
            used_context,
        }
    }

    /// Keeps hits in rank order until the next one would exceed the budget.
    fn fit_context(&self, context: Vec<SearchResult>) -> Vec<SearchResult> {
        let mut used_tokens = 0;
        let mut fitted = Vec::new();

        for result in context {
            let tokens = count_tokens(&result.chunk.text);
            if used_tokens + tokens > self.max_context_tokens {
                break;
            }
            used_tokens += tokens;
            fitted.push(result);
        }

        fitted
    }
}

fn render_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] (source: {})\n{}", i + 1, r.chunk.source, r.chunk.text.trim()))
        .collect::<Vec<_>>()
        .join("\n---\n")
}
