use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Recipient).string().not_null())
                    .col(
                        ColumnDef::new(Notifications::Subject)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Notifications::SentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Notifications::EntityKind).string_len(32))
                    .col(ColumnDef::new(Notifications::EntityId).integer())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Notifications::CreatedOn).date().not_null())
                    .col(
                        ColumnDef::new(Notifications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Enforces one reminder per record, recipient and subject per business day.
        // Rows without an entity never collide (NULLs are distinct).
        manager
            .create_index(
                Index::create()
                    .table(Notifications::Table)
                    .col(Notifications::Recipient)
                    .col(Notifications::Subject)
                    .col(Notifications::EntityKind)
                    .col(Notifications::EntityId)
                    .col(Notifications::CreatedOn)
                    .unique()
                    .name("uq_notifications_dedup_key")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Notifications::Table)
                    .col(Notifications::EntityKind)
                    .col(Notifications::EntityId)
                    .name("idx_notifications_entity")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Notifications::Table)
                    .col((Notifications::CreatedAt, IndexOrder::Desc))
                    .name("idx_notifications_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    Recipient,
    Subject,
    Message,
    Status,
    SentAt,
    EntityKind,
    EntityId,
    CreatedAt,
    CreatedOn,
    UpdatedAt,
}
