pub mod auth;
pub mod cards;
pub mod flashcards;
pub mod health;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::ping)
            .configure(auth::auth_routes)
            .configure(cards::cards_routes)
            .configure(flashcards::flashcards_routes)
    );
}
