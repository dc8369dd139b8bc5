// src/domain/breach_record_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use super::breach_record::BreachRecord;
use super::breach_status::BreachStatus;
use super::severity::Severity;

/// jsonb配列カラム用の文字列リスト
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_breaches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub phone: String,
    pub breach_date: NaiveDate,
    #[sea_orm(column_type = "Text")]
    pub breach_source: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub compromised_data: StringList,
    pub severity: String,
    pub status: String,
    pub removal_requested: bool,
    #[sea_orm(nullable)]
    pub request_date: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_picture: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub breach_documents: StringList,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl TryFrom<Model> for BreachRecord {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<BreachStatus>()
            .map_err(DbErr::Type)?;
        let severity = model.severity.parse::<Severity>().map_err(DbErr::Type)?;

        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            breach_date: model.breach_date,
            breach_source: model.breach_source,
            severity,
            compromised_data: model.compromised_data.0,
            status,
            removal_requested: model.removal_requested,
            request_date: model.request_date,
            profile_picture: model.profile_picture,
            breach_documents: model.breach_documents.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&BreachRecord> for ActiveModel {
    fn from(record: &BreachRecord) -> Self {
        Self {
            id: Set(record.id),
            name: Set(record.name.clone()),
            email: Set(record.email.clone()),
            phone: Set(record.phone.clone()),
            breach_date: Set(record.breach_date),
            breach_source: Set(record.breach_source.clone()),
            compromised_data: Set(StringList(record.compromised_data.clone())),
            severity: Set(record.severity.as_str().to_string()),
            status: Set(record.status.as_str().to_string()),
            removal_requested: Set(record.removal_requested),
            request_date: Set(record.request_date),
            profile_picture: Set(record.profile_picture.clone()),
            breach_documents: Set(StringList(record.breach_documents.clone())),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        }
    }
}
