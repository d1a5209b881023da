use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::error;

use crate::models::dto::{FlashcardSetResponse, GeneratedCard};
use crate::models::flashcard_sets::{
    ActiveModel as SetActiveModel, Column as SetColumn, Entity as FlashcardSets,
};
use crate::models::flashcards::{
    ActiveModel as FlashcardActiveModel, Column as FlashcardColumn, Entity as Flashcards,
};
use crate::services::ai_service::AiClient;

// DTO pour générer un set
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlashcardsRequest {
    pub user_id: i32,
    pub topic: String,
}

// DTO pour lister les sets d'un utilisateur
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFlashcardSetsRequest {
    pub user_id: i32,
}

// DTO pour les opérations sur un set existant (test, suppression)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScopedRequest {
    pub user_id: i32,
    pub set_id: i32,
}

// DTO pour enregistrer un score de test
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTestScoreRequest {
    pub user_id: i32,
    pub set_id: i32,
    pub score: i32,
}

/// POST /api/generate-flashcards - Générer un set par IA et le persister
#[post("/generate-flashcards")]
pub async fn generate_flashcards(
    body: web::Json<GenerateFlashcardsRequest>,
    db: web::Data<DatabaseConnection>,
    ai: web::Data<AiClient>,
) -> HttpResponse {
    let topic = body.topic.trim();
    if topic.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Please enter a topic to study" }));
    }

    // 1. Demander les cartes à l'IA
    let cards = match ai.generate_flashcards(topic).await {
        Ok(cards) if !cards.is_empty() => cards,
        Ok(_) => {
            return HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": "AI returned no flashcards" }));
        }
        Err(e) => {
            error!("flashcard generation failed: {}", e);
            return HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": "AI service temporarily unavailable" }));
        }
    };

    // 2. Persister le set
    let new_set = SetActiveModel {
        id: NotSet,
        user_id: Set(body.user_id),
        topic: Set(topic.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        highest_score: Set(0),
    };

    let set = match new_set.insert(db.get_ref()).await {
        Ok(set) => set,
        Err(e) => return db_error(e),
    };

    // 3. Puis ses cartes
    let rows: Vec<FlashcardActiveModel> = cards
        .iter()
        .map(|c| FlashcardActiveModel {
            id: NotSet,
            set_id: Set(set.id),
            question: Set(c.question.clone()),
            answer: Set(c.answer.clone()),
        })
        .collect();

    if let Err(e) = Flashcards::insert_many(rows).exec(db.get_ref()).await {
        return db_error(e);
    }

    HttpResponse::Ok().json(cards)
}

/// POST /api/get-flashcard-sets - Tous les sets de l'utilisateur, plus récents d'abord
#[post("/get-flashcard-sets")]
pub async fn get_flashcard_sets(
    body: web::Json<GetFlashcardSetsRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let sets_with_cards = FlashcardSets::find()
        .find_with_related(Flashcards)
        .filter(SetColumn::UserId.eq(body.user_id))
        .order_by_desc(SetColumn::CreatedAt)
        .all(db.get_ref())
        .await;

    match sets_with_cards {
        Ok(sets_with_cards) => {
            let response: Vec<FlashcardSetResponse> = sets_with_cards
                .into_iter()
                .map(|(set, cards)| FlashcardSetResponse {
                    id: set.id,
                    topic: set.topic,
                    card_count: cards.len(),
                    created_at: set.created_at,
                    highest_score: set.highest_score,
                    flashcards: cards
                        .into_iter()
                        .map(|c| GeneratedCard {
                            question: c.question,
                            answer: c.answer,
                        })
                        .collect(),
                })
                .collect();

            HttpResponse::Ok().json(response)
        }
        Err(e) => db_error(e),
    }
}

/// POST /api/generate-test - Test à choix multiples sur un set (jamais persisté)
#[post("/generate-test")]
pub async fn generate_test(
    body: web::Json<SetScopedRequest>,
    db: web::Data<DatabaseConnection>,
    ai: web::Data<AiClient>,
) -> HttpResponse {
    // 1. Le set doit exister et appartenir à l'utilisateur
    let set = match find_owned_set(db.get_ref(), body.set_id, body.user_id).await {
        Ok(Some(set)) => set,
        Ok(None) => return set_not_found(),
        Err(e) => return db_error(e),
    };

    // 2. Récupérer ses cartes comme matériau du test
    let cards = match Flashcards::find()
        .filter(FlashcardColumn::SetId.eq(set.id))
        .all(db.get_ref())
        .await
    {
        Ok(cards) => cards,
        Err(e) => return db_error(e),
    };

    let cards: Vec<GeneratedCard> = cards
        .into_iter()
        .map(|c| GeneratedCard {
            question: c.question,
            answer: c.answer,
        })
        .collect();

    if cards.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Flashcard set is empty" }));
    }

    // 3. Générer les questions
    match ai.generate_test(&set.topic, &cards).await {
        Ok(questions) => HttpResponse::Ok().json(questions),
        Err(e) => {
            error!("test generation failed: {}", e);
            HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": "AI service temporarily unavailable" }))
        }
    }
}

/// POST /api/store-test-score - Enregistrer un résultat; le score du set ne fait que monter
#[post("/store-test-score")]
pub async fn store_test_score(
    body: web::Json<StoreTestScoreRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let set = match find_owned_set(db.get_ref(), body.set_id, body.user_id).await {
        Ok(Some(set)) => set,
        Ok(None) => return set_not_found(),
        Err(e) => return db_error(e),
    };

    if body.score > set.highest_score {
        let mut active: SetActiveModel = set.into();
        active.highest_score = Set(body.score.clamp(0, 100));
        if let Err(e) = active.update(db.get_ref()).await {
            return db_error(e);
        }
    }

    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}

/// POST /api/delete-flashcard-set - Supprimer un set et ses cartes
#[post("/delete-flashcard-set")]
pub async fn delete_flashcard_set(
    body: web::Json<SetScopedRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let set = match find_owned_set(db.get_ref(), body.set_id, body.user_id).await {
        Ok(Some(set)) => set,
        Ok(None) => return set_not_found(),
        Err(e) => return db_error(e),
    };

    // Les cartes d'abord, puis le set
    if let Err(e) = Flashcards::delete_many()
        .filter(FlashcardColumn::SetId.eq(set.id))
        .exec(db.get_ref())
        .await
    {
        return db_error(e);
    }

    match set.delete(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => db_error(e),
    }
}

async fn find_owned_set(
    db: &DatabaseConnection,
    set_id: i32,
    user_id: i32,
) -> Result<Option<crate::models::flashcard_sets::Model>, DbErr> {
    FlashcardSets::find_by_id(set_id)
        .filter(SetColumn::UserId.eq(user_id))
        .one(db)
        .await
}

fn set_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Flashcard set not found" }))
}

fn db_error(e: DbErr) -> HttpResponse {
    error!("database error: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Database error" }))
}

pub fn flashcards_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_flashcards)
        .service(get_flashcard_sets)
        .service(generate_test)
        .service(store_test_score)
        .service(delete_flashcard_set);
}
