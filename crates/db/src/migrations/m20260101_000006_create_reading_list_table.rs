//! Create reading_list table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReadingList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReadingList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReadingList::UserKey).string_len(128).not_null())
                    .col(ColumnDef::new(ReadingList::PostId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ReadingList::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ReadingList::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reading_list_post")
                            .from(ReadingList::Table, ReadingList::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReadingList::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReadingList {
    Table,
    Id,
    UserKey,
    PostId,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}
