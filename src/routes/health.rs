use actix_web::{get, HttpResponse};
use chrono::Utc;
use crate::models::health::PingResponse;

#[get("/ping")]
pub async fn ping() -> HttpResponse {
    let response = PingResponse {
        message: "Hello World".to_string(),
        time: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}
