use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::dto::{GeneratedCard, TestQuestion};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const CARDS_PER_SET: usize = 10;
const QUESTIONS_PER_TEST: usize = 5;

/// Client de génération de texte (API compatible chat-completions).
/// Simple collaborateur: on construit un prompt, on parse le JSON rendu.
#[derive(Clone)]
pub struct AiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl AiClient {
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
            eprintln!("⚠️  WARNING: OPENAI_API_KEY not set, flashcard generation will fail");
            String::new()
        });
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        // La génération est lente, mais pas infinie
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key, model }
    }

    async fn chat(&self, user_prompt: &str) -> Result<String, String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a study assistant. Reply with raw JSON only, no markdown.",
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("AI request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("AI service returned {}", response.status()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid AI response: {}", e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "AI response contained no choices".to_string())
    }

    /// Génère les cartes question/réponse d'un nouveau set
    pub async fn generate_flashcards(&self, topic: &str) -> Result<Vec<GeneratedCard>, String> {
        let prompt = format!(
            "Generate exactly {} study flashcards about \"{}\". \
             Reply with a JSON array of objects with fields \"question\" and \"answer\".",
            CARDS_PER_SET, topic
        );

        let content = self.chat(&prompt).await?;
        parse_json_payload(&content)
    }

    /// Génère un test à choix multiples à partir des cartes d'un set existant
    pub async fn generate_test(
        &self,
        topic: &str,
        cards: &[GeneratedCard],
    ) -> Result<Vec<TestQuestion>, String> {
        let material = cards
            .iter()
            .map(|c| format!("Q: {}\nA: {}", c.question, c.answer))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Here are study flashcards about \"{}\":\n{}\n\
             Generate {} multiple-choice questions testing this material. \
             Reply with a JSON array of objects with fields \"question\", \
             \"options\" (array of 4 strings), \"correctAnswer\" (index 0-3) \
             and \"explanation\".",
            topic, material, QUESTIONS_PER_TEST
        );

        let content = self.chat(&prompt).await?;
        parse_json_payload(&content)
    }
}

/// Certains modèles entourent le JSON de ```json ... ``` malgré la consigne
fn strip_markdown_fences(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn parse_json_payload<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, String> {
    serde_json::from_str(strip_markdown_fences(content))
        .map_err(|e| format!("AI returned unparseable JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json_array() {
        let content = r#"[{"question": "Q1", "answer": "A1"}]"#;
        let cards: Vec<GeneratedCard> = parse_json_payload(content).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Q1");
    }

    #[test]
    fn test_parse_fenced_json_array() {
        let content = "```json\n[{\"question\": \"Q1\", \"answer\": \"A1\"}]\n```";
        let cards: Vec<GeneratedCard> = parse_json_payload(content).unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_parse_test_questions_camel_case() {
        let content = r#"[{"question": "Q", "options": ["a", "b", "c", "d"], "correctAnswer": 2, "explanation": "because"}]"#;
        let questions: Vec<TestQuestion> = parse_json_payload(content).unwrap();
        assert_eq!(questions[0].correct_answer, 2);
        assert_eq!(questions[0].options.len(), 4);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let result: Result<Vec<GeneratedCard>, String> = parse_json_payload("Sure! Here are your cards:");
        assert!(result.is_err());
    }
}
