// ============================================================================
// MODÈLE : USERS
// ============================================================================
//
// Description:
//   Le compte utilisateur complet: profil, credentials et les deux axes
//   d'état (vérification email, reset password en attente).
//
// Colonnes de la table users:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - login (VARCHAR, UNIQUE, NOT NULL)
//   - email (VARCHAR, UNIQUE, NOT NULL)
//   - password_hash (VARCHAR, NOT NULL) - format pbkdf2:sha256:iterations$salt$hash
//   - first_name / last_name (VARCHAR, NOT NULL)
//   - verified (BOOLEAN, DEFAULT FALSE, NOT NULL)
//   - verification_code (VARCHAR, NULL) - code 6 chiffres, présent tant que
//     le compte n'a jamais été vérifié
//   - reset_code (VARCHAR, NULL) - code 6 chiffres d'un reset en attente
//   - reset_code_expires_at (TIMESTAMP, NULL) - toujours présent/absent
//     ensemble avec reset_code (expire 1 heure)
//
// Workflow:
//   1. POST /api/signup crée le compte avec verified = false + code
//   2. POST /api/verify passe verified = true et efface le code (définitif)
//   3. POST /api/request-password-reset pose reset_code + expiry (écrase
//      un reset précédent, seul le dernier code compte)
//   4. POST /api/reset-password remplace le hash et efface code + expiry
//
// Points d'attention:
//   - UNIQUE sur login et email: c'est la contrainte BD qui garantit
//     l'unicité sous écritures concurrentes, le pré-check applicatif ne
//     sert qu'au message d'erreur
//   - verified ne repasse jamais à false
//   - Un code expiré n'est pas purgé, il devient juste inutilisable
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub login: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    pub verified: bool,

    pub verification_code: Option<String>,

    pub reset_code: Option<String>,

    pub reset_code_expires_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cards::Entity")]
    Cards,

    #[sea_orm(has_many = "super::flashcard_sets::Entity")]
    FlashcardSets,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::flashcard_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlashcardSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
