use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_data_breaches_table::DataBreaches;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 公開検索は status = 'approved' で絞り込む
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(DataBreaches::Table)
                    .name("idx_data_breaches_status")
                    .col(DataBreaches::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(DataBreaches::Table)
                    .name("idx_data_breaches_breach_date")
                    .col(DataBreaches::BreachDate)
                    .to_owned(),
            )
            .await?;

        // 削除リクエストは (email, phone) の組で照合する
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(DataBreaches::Table)
                    .name("idx_data_breaches_email_phone")
                    .col(DataBreaches::Email)
                    .col(DataBreaches::Phone)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(DataBreaches::Table)
                    .name("idx_data_breaches_created_at")
                    .col(DataBreaches::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_data_breaches_status",
            "idx_data_breaches_breach_date",
            "idx_data_breaches_email_phone",
            "idx_data_breaches_created_at",
        ] {
            manager
                .drop_index(
                    Index::drop()
                        .if_exists()
                        .name(name)
                        .table(DataBreaches::Table)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
