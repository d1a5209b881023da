mod models;
mod routes;
mod db;
mod services;
mod utils;
use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tracing_subscriber::EnvFilter;

use crate::services::{ai_service::AiClient, email_service};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    let mailer = email_service::from_env();
    let ai = AiClient::from_env();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    println!("🚀 Starting server on http://0.0.0.0:{}", port);

    let db = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            // Le backend est consommé par le web et le mobile depuis d'autres origines
            .wrap(Cors::permissive())
            .app_data(db.clone())
            .app_data(web::Data::from(mailer.clone()))
            .app_data(web::Data::new(ai.clone()))
            .configure(routes::configure_routes)
    })
        .bind(("0.0.0.0", port))?
        .run()
        .await
}
