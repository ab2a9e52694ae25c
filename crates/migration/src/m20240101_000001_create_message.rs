//! Create `message` table.
//!
//! One row per authored message with its like counter.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(uuid(Message::Id).primary_key())
                    .col(string_len(Message::Author, 255).not_null())
                    .col(text(Message::Content).not_null())
                    .col(big_integer(Message::LikeCount).not_null().default(0))
                    .col(timestamp_with_time_zone(Message::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Message::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Message { Table, Id, Author, Content, LikeCount, CreatedAt }
