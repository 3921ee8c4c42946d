use crate::entities::credit_history_entity as credit_histories;
use crate::error::{AppError, AppResult};
use crate::models::{CreditHistoryResponse, UpdateCreditHistory};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set,
    TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct CreditHistoryService {
    pool: DatabaseConnection,
}

impl CreditHistoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find_one(&self, id: Uuid) -> AppResult<CreditHistoryResponse> {
        Ok(Self::find_record(&self.pool, id).await?.into())
    }

    /// 覆盖 name / description / value / status / deposit_type
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCreditHistory,
    ) -> AppResult<CreditHistoryResponse> {
        let txn = self.pool.begin().await?;
        let record = Self::find_record(&txn, id).await?;

        let mut model = record.into_active_model();
        model.name = Set(input.name);
        model.description = Set(input.description);
        model.value = Set(input.value);
        model.status = Set(input.status);
        model.deposit_type = Set(input.deposit_type);
        model.updated_at = Set(Utc::now());
        let updated = model.update(&txn).await?;

        txn.commit().await?;
        log::info!(
            "Updated credit history {} (status={:?}, deposit_type={:?})",
            id,
            updated.status,
            updated.deposit_type
        );
        Ok(updated.into())
    }

    async fn find_record<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> AppResult<credit_histories::Model> {
        credit_histories::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Credit history {id} not found")))
    }
}
