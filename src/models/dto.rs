//pour les réponses structurées des endpoints flashcards

use serde::{Deserialize, Serialize};

// 1 carte question/réponse telle que générée par l'IA
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub question: String,
    pub answer: String,
}

// 1 question de test à choix multiples (jamais persistée)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

// 1 set avec ses cartes, pour /api/get-flashcard-sets
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSetResponse {
    pub id: i32,
    pub topic: String,
    pub card_count: usize,
    pub created_at: chrono::NaiveDateTime,
    pub highest_score: i32,
    pub flashcards: Vec<GeneratedCard>,
}
