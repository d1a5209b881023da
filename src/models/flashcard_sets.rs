// ============================================================================
// MODÈLE : FLASHCARD SETS
// ============================================================================
//
// Description:
//   Un set de flashcards généré par IA pour un sujet d'étude donné.
//   Les cartes elles-mêmes sont dans la table flashcards (relation 1-N).
//
// Colonnes de la table flashcard_sets:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - user_id (INTEGER, NOT NULL, FK vers users)
//   - topic (VARCHAR, NOT NULL) - le sujet saisi par l'utilisateur
//   - created_at (TIMESTAMP, NOT NULL)
//   - highest_score (INTEGER, DEFAULT 0) - meilleur score de test (0-100),
//     ne fait que monter
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flashcard_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub topic: String,

    pub created_at: DateTime,

    pub highest_score: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(has_many = "super::flashcards::Entity")]
    Flashcards,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::flashcards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flashcards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
