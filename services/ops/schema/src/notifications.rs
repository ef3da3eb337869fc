use sea_orm::entity::prelude::*;

/// One attempted email to one recipient.
///
/// `(recipient, subject, entity_kind, entity_id, created_on)` is unique, so a
/// reminder for the same record is sent at most once per business day.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: String,
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub entity_kind: Option<String>,
    pub entity_id: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_on: Date,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
