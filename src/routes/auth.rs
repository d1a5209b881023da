use actix_web::{post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::account_service::{AccountError, AccountService, NewAccount};
use crate::services::email_service::Mailer;

// DTO pour l'inscription
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password: String,
    pub email: String,
}

// DTO pour la vérification email
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub login: String,
    pub verification_code: String,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

// DTO pour demander un reset
#[derive(Deserialize)]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

// DTO pour consommer le reset
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub reset_code: String,
    pub new_password: String,
}

// Réponse après login
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// POST /api/signup - Créer un compte (non vérifié, code envoyé par email)
#[post("/signup")]
pub async fn signup(
    body: web::Json<SignupRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<dyn Mailer>,
) -> HttpResponse {
    let body = body.into_inner();
    let account = NewAccount {
        first_name: body.first_name,
        last_name: body.last_name,
        login: body.login,
        password: body.password,
        email: body.email,
    };

    match AccountService::create_account(db.get_ref(), mailer.into_inner(), account).await {
        Ok(()) => HttpResponse::Created().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

/// POST /api/verify - Confirmer le code de vérification reçu par email
#[post("/verify")]
pub async fn verify(
    body: web::Json<VerifyRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match AccountService::verify_account(db.get_ref(), &body.login, &body.verification_code).await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

/// POST /api/login - Se connecter (refusé tant que le compte n'est pas vérifié)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match AccountService::authenticate(db.get_ref(), &body.login, &body.password).await {
        Ok(user) => HttpResponse::Ok().json(LoginResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
        Err(e) => error_response(e),
    }
}

/// POST /api/request-password-reset - Émettre un code de reset (valable 1h)
#[post("/request-password-reset")]
pub async fn request_password_reset(
    body: web::Json<RequestPasswordResetRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<dyn Mailer>,
) -> HttpResponse {
    match AccountService::request_password_reset(db.get_ref(), mailer.into_inner(), &body.email)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

/// POST /api/reset-password - Consommer le code et remplacer le mot de passe
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match AccountService::reset_password(
        db.get_ref(),
        &body.email,
        &body.reset_code,
        &body.new_password,
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => error_response(e),
    }
}

/// Traduction AccountError -> réponse HTTP. L'appelant reçoit toujours un
/// message lisible, jamais une erreur driver brute.
fn error_response(err: AccountError) -> HttpResponse {
    match &err {
        AccountError::Storage(e) => error!("database error: {}", e),
        AccountError::Internal(e) => error!("internal error: {}", e),
        _ => {}
    }

    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        AccountError::DuplicateLogin | AccountError::DuplicateEmail => {
            HttpResponse::Conflict().json(body)
        }
        AccountError::InvalidVerificationCode
        | AccountError::InvalidResetCode
        | AccountError::ResetCodeExpired => HttpResponse::BadRequest().json(body),
        AccountError::InvalidCredentials => HttpResponse::Unauthorized().json(body),
        AccountError::UnverifiedAccount => HttpResponse::Forbidden().json(body),
        AccountError::NoAccountForEmail => HttpResponse::NotFound().json(body),
        AccountError::Storage(_) | AccountError::Internal(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(verify)
        .service(login)
        .service(request_password_reset)
        .service(reset_password);
}
