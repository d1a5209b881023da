use actix_web::{post, web, HttpResponse};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    Set,
};
use serde::Deserialize;
use tracing::error;

use crate::models::cards::{
    ActiveModel as CardActiveModel, Column as CardColumn, Entity as Cards,
};

// DTO pour ajouter une carte
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCardRequest {
    pub user_id: i32,
    pub card: String,
}

// DTO pour la recherche
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCardsRequest {
    pub user_id: i32,
    pub search: String,
}

/// POST /api/addcard - Ajouter une carte texte libre
#[post("/addcard")]
pub async fn add_card(
    body: web::Json<AddCardRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let new_card = CardActiveModel {
        id: NotSet,
        user_id: Set(body.user_id),
        card: Set(body.card.clone()),
    };

    match new_card.insert(db.get_ref()).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({ "error": "" })),
        Err(e) => db_error(e),
    }
}

/// POST /api/searchcards - Recherche par sous-chaîne (insensible à la casse)
/// dans les cartes de l'utilisateur
#[post("/searchcards")]
pub async fn search_cards(
    body: web::Json<SearchCardsRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let needle = body.search.trim();

    let found = Cards::find()
        .filter(CardColumn::UserId.eq(body.user_id))
        .filter(Expr::col(CardColumn::Card).ilike(format!("%{}%", needle)))
        .all(db.get_ref())
        .await;

    match found {
        Ok(cards) => {
            let results: Vec<String> = cards.into_iter().map(|c| c.card).collect();
            HttpResponse::Ok().json(serde_json::json!({ "results": results, "error": "" }))
        }
        Err(e) => db_error(e),
    }
}

fn db_error(e: DbErr) -> HttpResponse {
    error!("database error: {}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Database error" }))
}

pub fn cards_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(add_card).service(search_cards);
}
