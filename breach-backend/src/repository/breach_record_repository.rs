// src/repository/breach_record_repository.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::{contains_pattern, BreachRecordRepository, SearchCriteria, SearchField};
use crate::domain::breach_record::{BreachRecord, BreachRecordChanges};
use crate::domain::breach_record_model::{
    self, ActiveModel as BreachActiveModel, Entity as BreachEntity, StringList,
};
use crate::domain::breach_status::BreachStatus;

pub struct PgBreachRecordRepository {
    db: DbConn,
}

impl PgBreachRecordRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn search_column(field: SearchField) -> breach_record_model::Column {
        match field {
            SearchField::Email => breach_record_model::Column::Email,
            SearchField::Phone => breach_record_model::Column::Phone,
            SearchField::Name => breach_record_model::Column::Name,
        }
    }

    fn into_records(models: Vec<breach_record_model::Model>) -> Result<Vec<BreachRecord>, DbErr> {
        models.into_iter().map(BreachRecord::try_from).collect()
    }
}

#[async_trait]
impl BreachRecordRepository for PgBreachRecordRepository {
    async fn find_approved_matching(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<BreachRecord>, DbErr> {
        let column = Self::search_column(criteria.field);

        // LOWER(col) LIKE '%query%' ESCAPE '\'
        let mut conditions = Condition::all()
            .add(breach_record_model::Column::Status.eq(BreachStatus::Approved.as_str()))
            .add(
                Expr::expr(Func::lower(Expr::col((BreachEntity, column))))
                    .like(LikeExpr::new(contains_pattern(&criteria.query)).escape('\\')),
            );

        if let Some(start) = criteria.date_range.start {
            conditions = conditions.add(breach_record_model::Column::BreachDate.gte(start));
        }
        if let Some(end) = criteria.date_range.end {
            conditions = conditions.add(breach_record_model::Column::BreachDate.lte(end));
        }

        let models = BreachEntity::find()
            .filter(conditions)
            .order_by_desc(breach_record_model::Column::BreachDate)
            .order_by_desc(breach_record_model::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Self::into_records(models)
    }

    async fn find_all(&self) -> Result<Vec<BreachRecord>, DbErr> {
        let models = BreachEntity::find()
            .order_by_desc(breach_record_model::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Self::into_records(models)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BreachRecord>, DbErr> {
        BreachEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(BreachRecord::try_from)
            .transpose()
    }

    async fn insert(&self, record: BreachRecord) -> Result<BreachRecord, DbErr> {
        let active = BreachActiveModel::from(&record);
        let model = active.insert(&self.db).await?;
        BreachRecord::try_from(model)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BreachRecordChanges,
    ) -> Result<Option<BreachRecord>, DbErr> {
        let Some(model) = BreachEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: BreachActiveModel = model.into();
        active.name = Set(changes.name);
        active.email = Set(changes.email);
        active.phone = Set(changes.phone);
        active.breach_date = Set(changes.breach_date);
        active.breach_source = Set(changes.breach_source);
        active.severity = Set(changes.severity.as_str().to_string());
        active.compromised_data = Set(StringList(changes.compromised_data));
        active.status = Set(changes.status.as_str().to_string());

        let updated = active.update(&self.db).await?;
        BreachRecord::try_from(updated).map(Some)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BreachStatus,
    ) -> Result<Option<BreachRecord>, DbErr> {
        let Some(model) = BreachEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: BreachActiveModel = model.into();
        active.status = Set(status.as_str().to_string());

        let updated = active.update(&self.db).await?;
        BreachRecord::try_from(updated).map(Some)
    }

    async fn mark_removal_requested(
        &self,
        email: &str,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let result = BreachEntity::update_many()
            .col_expr(
                breach_record_model::Column::RemovalRequested,
                Expr::value(true),
            )
            .col_expr(breach_record_model::Column::RequestDate, Expr::value(at))
            .col_expr(breach_record_model::Column::UpdatedAt, Expr::value(at))
            .filter(breach_record_model::Column::Email.eq(email))
            .filter(breach_record_model::Column::Phone.eq(phone))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = BreachEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = BreachEntity::delete_many()
            .filter(breach_record_model::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
