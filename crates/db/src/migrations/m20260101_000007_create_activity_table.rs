//! Create activity table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activity::UserKey).string_len(128).not_null())
                    .col(ColumnDef::new(Activity::ActivityType).string_len(64).not_null())
                    .col(ColumnDef::new(Activity::EntityType).string_len(64).not_null())
                    .col(ColumnDef::new(Activity::EntityId).string_len(128).not_null())
                    .col(ColumnDef::new(Activity::Metadata).json_binary())
                    .col(
                        ColumnDef::new(Activity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_key, created_at) for per-user feeds
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_user_created")
                    .table(Activity::Table)
                    .col(Activity::UserKey)
                    .col(Activity::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Activity {
    Table,
    Id,
    UserKey,
    ActivityType,
    EntityType,
    EntityId,
    Metadata,
    CreatedAt,
}
