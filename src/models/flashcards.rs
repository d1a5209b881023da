use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Une carte question/réponse appartenant à un set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flashcards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub set_id: i32,

    pub question: String,

    pub answer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flashcard_sets::Entity",
        from = "Column::SetId",
        to = "super::flashcard_sets::Column::Id"
    )]
    Set,
}

impl Related<super::flashcard_sets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Set.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
