//! System prompts and response languages for the assistant.

use serde::{Deserialize, Serialize};

/// System prompt for the general pet-insurance assistant.
pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are PawCover's helpful pet insurance assistant. \
Answer questions about policies, coverage, claims and pet care clearly and concisely. \
If you are unsure about a policy detail, say so and suggest contacting customer support. \
Never invent policy numbers, prices or claim decisions.";

/// System prompt for reasoning-mode analysis.
pub const REASONING_SYSTEM_PROMPT: &str = "You are an analytical assistant for a pet insurance company. \
Think through the problem step by step and give a well-justified answer. \
State any assumptions explicitly.";

/// Prompt sent to the guard model ahead of the content under review.
pub const MODERATION_SYSTEM_PROMPT: &str = "You are a content safety classifier. \
Reply with exactly one word: \"safe\" if the user content is appropriate for a \
customer-facing pet insurance service, or \"unsafe\" otherwise.";

/// Languages the assistant can answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Indonesian,
    Malay,
    Thai,
    Vietnamese,
    Filipino,
    Tamil,
    Burmese,
    Khmer,
    Lao,
    Chinese,
}

impl Language {
    /// Name of the language as it should appear in a prompt.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Indonesian => "Bahasa Indonesia",
            Language::Malay => "Bahasa Melayu",
            Language::Thai => "Thai",
            Language::Vietnamese => "Vietnamese",
            Language::Filipino => "Filipino",
            Language::Tamil => "Tamil",
            Language::Burmese => "Burmese",
            Language::Khmer => "Khmer",
            Language::Lao => "Lao",
            Language::Chinese => "Simplified Chinese",
        }
    }

    /// Parse an ISO 639-1 code (`"id"`, `"ms"`, `"zh"`, ...).
    pub fn from_code(code: &str) -> Option<Self> {
        let lang = match code.trim().to_ascii_lowercase().as_str() {
            "en" => Language::English,
            "id" => Language::Indonesian,
            "ms" => Language::Malay,
            "th" => Language::Thai,
            "vi" => Language::Vietnamese,
            "fil" | "tl" => Language::Filipino,
            "ta" => Language::Tamil,
            "my" => Language::Burmese,
            "km" => Language::Khmer,
            "lo" => Language::Lao,
            "zh" => Language::Chinese,
            _ => return None,
        };
        Some(lang)
    }
}

/// System prompt asking for a reply in `language`.
pub fn multilingual_system_prompt(language: Language) -> String {
    format!(
        "{ASSISTANT_SYSTEM_PROMPT} Always respond in {}, regardless of the language \
         the question is asked in. Use natural, polite phrasing suited to native speakers.",
        language.display_name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ID"), Some(Language::Indonesian));
        assert_eq!(Language::from_code("tl"), Some(Language::Filipino));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_multilingual_prompt_names_language() {
        let prompt = multilingual_system_prompt(Language::Malay);
        assert!(prompt.contains("Bahasa Melayu"));
        assert!(prompt.starts_with(ASSISTANT_SYSTEM_PROMPT));
    }
}
