// ============================================================================
// SERVICE : CYCLE DE VIE DES COMPTES
// ============================================================================
//
// Les cinq opérations sur un compte:
//   1. create_account : signup + code de vérification envoyé par email
//   2. verify_account : consomme le code, verified devient true (définitif)
//   3. authenticate : login/password, bloqué tant que non vérifié
//   4. request_password_reset : pose un code 6 chiffres valable 1 heure
//   5. reset_password : consomme le code, remplace le hash
//
// Deux axes d'état indépendants sur le compte:
//   Vérification : non-vérifié --(verify_account)--> vérifié (terminal)
//   Reset : aucun --(request)--> en attente --(reset ok)--> aucun
//           en attente --(request)--> en attente (code remplacé)
//
// Points d'attention:
//   - Toute erreur stockage sort en AccountError::Storage, affichée
//     générique; le détail ne part que dans les logs
//   - Les envois d'email sont fire-and-forget: un échec n'annule jamais
//     la mutation du compte
//   - Les mots de passe ne sont jamais comparés en clair: lookup par login
//     puis vérification PBKDF2 contre le hash stocké
//
// ============================================================================

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    Set, SqlErr,
};
use thiserror::Error;

use crate::models::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as Users, Model as User,
};
use crate::services::email_service::{self, Mailer};
use crate::utils::{codes, password};

const RESET_CODE_VALIDITY_HOURS: i64 = 1;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Username already exists")]
    DuplicateLogin,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid verification code")]
    InvalidVerificationCode,

    #[error("Invalid user name/password")]
    InvalidCredentials,

    #[error("Please verify your email before logging in")]
    UnverifiedAccount,

    #[error("No account found for this email")]
    NoAccountForEmail,

    #[error("Invalid reset code")]
    InvalidResetCode,

    #[error("Reset code has expired")]
    ResetCodeExpired,

    /// Affichée générique, le détail part dans les logs
    #[error("Database error")]
    Storage(#[from] DbErr),

    #[error("Internal error")]
    Internal(String),
}

// DTO d'entrée pour create_account
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password: String,
    pub email: String,
}

pub struct AccountService;

impl AccountService {
    /// Crée un compte non vérifié et envoie le code de vérification par email.
    /// L'id est assigné par la séquence BD, jamais calculé côté application.
    pub async fn create_account(
        db: &DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        account: NewAccount,
    ) -> Result<(), AccountError> {
        // 1. Pré-check d'unicité, login d'abord (le conflit de login a priorité
        //    même si les deux champs sont pris)
        let by_login = Users::find()
            .filter(UserColumn::Login.eq(&account.login))
            .one(db)
            .await?;
        if by_login.is_some() {
            return Err(AccountError::DuplicateLogin);
        }

        let by_email = Users::find()
            .filter(UserColumn::Email.eq(&account.email))
            .one(db)
            .await?;
        if by_email.is_some() {
            return Err(AccountError::DuplicateEmail);
        }

        // 2. Hash du mot de passe
        let password_hash =
            password::hash_password(&account.password).map_err(AccountError::Internal)?;

        // 3. Générer le code de vérification et insérer
        let verification_code = codes::six_digit_code();

        let new_user = UserActiveModel {
            id: NotSet,
            login: Set(account.login.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(password_hash),
            first_name: Set(account.first_name.clone()),
            last_name: Set(account.last_name.clone()),
            verified: Set(false),
            verification_code: Set(Some(verification_code.clone())),
            reset_code: Set(None),
            reset_code_expires_at: Set(None),
        };

        if let Err(e) = new_user.insert(db).await {
            // Sous signups concurrents le pré-check peut passer deux fois:
            // l'index unique tranche, on retraduit la violation en conflit
            return Err(match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("login") => {
                    AccountError::DuplicateLogin
                }
                Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::DuplicateEmail,
                _ => AccountError::Storage(e),
            });
        }

        // 4. Email de vérification, jamais bloquant pour la création
        email_service::send_in_background(
            mailer,
            account.email,
            "Verify your account".to_string(),
            verification_email_html(&account.first_name, &verification_code),
        );

        Ok(())
    }

    /// Consomme le code de vérification. Correspondance exacte login + code,
    /// sans trim ni normalisation. Login inconnu et mauvais code renvoient la
    /// même erreur.
    pub async fn verify_account(
        db: &DatabaseConnection,
        login: &str,
        verification_code: &str,
    ) -> Result<(), AccountError> {
        let user = Users::find()
            .filter(UserColumn::Login.eq(login))
            .filter(UserColumn::VerificationCode.eq(verification_code))
            .one(db)
            .await?
            .ok_or(AccountError::InvalidVerificationCode)?;

        // Une fois le code effacé, un second appel retombe sur
        // InvalidVerificationCode: attendu, pas un cas spécial
        let mut active: UserActiveModel = user.into();
        active.verified = Set(true);
        active.verification_code = Set(None);
        active.update(db).await?;

        Ok(())
    }

    /// Login + mot de passe. Ne distingue pas login inconnu et mauvais mot de
    /// passe. La branche "non vérifié" n'est atteignable qu'avec des
    /// credentials corrects.
    pub async fn authenticate(
        db: &DatabaseConnection,
        login: &str,
        pwd: &str,
    ) -> Result<User, AccountError> {
        let user = Users::find()
            .filter(UserColumn::Login.eq(login))
            .one(db)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let is_valid =
            password::verify_password(pwd, &user.password_hash).map_err(AccountError::Internal)?;
        if !is_valid {
            return Err(AccountError::InvalidCredentials);
        }

        if !user.verified {
            return Err(AccountError::UnverifiedAccount);
        }

        Ok(user)
    }

    /// Pose un nouveau code de reset valable 1 heure, en écrasant un éventuel
    /// reset en attente: seul le dernier code émis compte.
    pub async fn request_password_reset(
        db: &DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        email: &str,
    ) -> Result<(), AccountError> {
        let user = Users::find()
            .filter(UserColumn::Email.eq(email))
            .one(db)
            .await?
            .ok_or(AccountError::NoAccountForEmail)?;

        let reset_code = codes::six_digit_code();
        let expires_at = (Utc::now() + Duration::hours(RESET_CODE_VALIDITY_HOURS)).naive_utc();

        let mut active: UserActiveModel = user.into();
        active.reset_code = Set(Some(reset_code.clone()));
        active.reset_code_expires_at = Set(Some(expires_at));
        active.update(db).await?;

        email_service::send_in_background(
            mailer,
            email.to_string(),
            "Your password reset code".to_string(),
            reset_email_html(&reset_code),
        );

        Ok(())
    }

    /// Consomme le code de reset: remplace le hash, efface code + expiry.
    /// Un code expiré n'est pas effacé ici, il reste en place jusqu'au
    /// prochain request_password_reset.
    pub async fn reset_password(
        db: &DatabaseConnection,
        email: &str,
        reset_code: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        let user = Users::find()
            .filter(UserColumn::Email.eq(email))
            .filter(UserColumn::ResetCode.eq(reset_code))
            .one(db)
            .await?
            .ok_or(AccountError::InvalidResetCode)?;

        match user.reset_code_expires_at {
            Some(expires_at) if expires_at > Utc::now().naive_utc() => {}
            _ => return Err(AccountError::ResetCodeExpired),
        }

        let password_hash =
            password::hash_password(new_password).map_err(AccountError::Internal)?;

        let mut active: UserActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.reset_code = Set(None);
        active.reset_code_expires_at = Set(None);
        active.update(db).await?;

        Ok(())
    }
}

fn verification_email_html(first_name: &str, code: &str) -> String {
    format!(
        "<h2>Welcome!</h2>\
         <p>Hi {first_name},</p>\
         <p>Thank you for signing up. Please verify your email address using the code below:</p>\
         <h1 style=\"letter-spacing: 5px;\">{code}</h1>\
         <p>If you didn't create this account, please ignore this email.</p>"
    )
}

fn reset_email_html(code: &str) -> String {
    format!(
        "<h2>Password reset</h2>\
         <p>Use the code below to reset your password. It expires in 1 hour.</p>\
         <h1 style=\"letter-spacing: 5px;\">{code}</h1>\
         <p>If you didn't request a password reset, you can ignore this email.</p>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::email_service::NoopMailer;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn sample_user() -> User {
        User {
            id: 1,
            login: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: password::hash_password("pw123").unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            verified: false,
            verification_code: Some("123456".to_string()),
            reset_code: None,
            reset_code_expires_at: None,
        }
    }

    fn new_account() -> NewAccount {
        NewAccount {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            login: "ada".to_string(),
            password: "pw123".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicate_login() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user()]])
            .into_connection();

        let err = AccountService::create_account(&db, Arc::new(NoopMailer), new_account())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateLogin));
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicate_email() {
        // Login libre, email déjà pris par un autre compte
        let other = User {
            login: "someone-else".to_string(),
            ..sample_user()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<User>::new(), vec![other]])
            .into_connection();

        let err = AccountService::create_account(&db, Arc::new(NoopMailer), new_account())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_create_account_inserts_unverified() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<User>::new(), Vec::<User>::new(), vec![sample_user()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let result = AccountService::create_account(&db, Arc::new(NoopMailer), new_account()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_verify_account_with_wrong_code_fails() {
        // Login inconnu et mauvais code passent par le même chemin: zéro match
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<User>::new()])
            .into_connection();

        let err = AccountService::verify_account(&db, "ada", "000000")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidVerificationCode));
    }

    #[tokio::test]
    async fn test_verify_account_marks_verified_and_clears_code() {
        let verified = User {
            verified: true,
            verification_code: None,
            ..sample_user()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user()], vec![verified]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = AccountService::verify_account(&db, "ada", "123456").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_login() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<User>::new()])
            .into_connection();

        let err = AccountService::authenticate(&db, "nobody", "pw123")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user()]])
            .into_connection();

        // Même erreur que pour un login inconnu
        let err = AccountService::authenticate(&db, "ada", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unverified_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user()]])
            .into_connection();

        // Credentials corrects mais compte jamais vérifié
        let err = AccountService::authenticate(&db, "ada", "pw123")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::UnverifiedAccount));
    }

    #[tokio::test]
    async fn test_authenticate_verified_account() {
        let verified = User {
            verified: true,
            verification_code: None,
            ..sample_user()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![verified]])
            .into_connection();

        let user = AccountService::authenticate(&db, "ada", "pw123")
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_request_reset_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<User>::new()])
            .into_connection();

        let err =
            AccountService::request_password_reset(&db, Arc::new(NoopMailer), "nobody@example.com")
                .await
                .unwrap_err();
        assert!(matches!(err, AccountError::NoAccountForEmail));
    }

    #[tokio::test]
    async fn test_request_reset_sets_code_and_expiry() {
        let with_reset = User {
            reset_code: Some("654321".to_string()),
            reset_code_expires_at: Some((Utc::now() + Duration::hours(1)).naive_utc()),
            ..sample_user()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user()], vec![with_reset]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result =
            AccountService::request_password_reset(&db, Arc::new(NoopMailer), "ada@example.com")
                .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_wrong_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<User>::new()])
            .into_connection();

        let err = AccountService::reset_password(&db, "ada@example.com", "000000", "newpw456")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidResetCode));
    }

    #[tokio::test]
    async fn test_reset_password_expired_code() {
        // Le code correspond exactement, mais l'expiry est passée
        let expired = User {
            reset_code: Some("654321".to_string()),
            reset_code_expires_at: Some((Utc::now() - Duration::minutes(5)).naive_utc()),
            ..sample_user()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![expired]])
            .into_connection();

        let err = AccountService::reset_password(&db, "ada@example.com", "654321", "newpw456")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::ResetCodeExpired));
    }

    #[tokio::test]
    async fn test_reset_password_success_clears_code() {
        let pending = User {
            reset_code: Some("654321".to_string()),
            reset_code_expires_at: Some((Utc::now() + Duration::minutes(30)).naive_utc()),
            ..sample_user()
        };
        let after = User {
            password_hash: password::hash_password("newpw456").unwrap(),
            reset_code: None,
            reset_code_expires_at: None,
            ..sample_user()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending], vec![after]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result =
            AccountService::reset_password(&db, "ada@example.com", "654321", "newpw456").await;
        assert!(result.is_ok());
    }
}
