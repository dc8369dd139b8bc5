use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DataBreaches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DataBreaches::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DataBreaches::Name).text().not_null())
                    .col(ColumnDef::new(DataBreaches::Email).text().not_null())
                    .col(ColumnDef::new(DataBreaches::Phone).text().not_null())
                    .col(ColumnDef::new(DataBreaches::BreachDate).date().not_null())
                    .col(ColumnDef::new(DataBreaches::BreachSource).text().not_null())
                    .col(
                        // 順序付きのラベル配列をJSONで保持
                        ColumnDef::new(DataBreaches::CompromisedData)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(DataBreaches::Severity)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(DataBreaches::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DataBreaches::RemovalRequested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DataBreaches::RequestDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(DataBreaches::ProfilePicture).text())
                    .col(
                        ColumnDef::new(DataBreaches::BreachDocuments)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(DataBreaches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DataBreaches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataBreaches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DataBreaches {
    Table,
    Id,
    Name,
    Email,
    Phone,
    BreachDate,
    BreachSource,
    CompromisedData,
    Severity,
    Status,
    RemovalRequested,
    RequestDate,
    ProfilePicture,
    BreachDocuments,
    CreatedAt,
    UpdatedAt,
}
