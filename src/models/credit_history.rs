use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::{CreditStatus, DepositType, credit_history_entity as credit_histories};
use crate::error::AppResult;

/// 更新充值记录请求
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCreditHistoryRequest {
    pub name: Option<String>,
    #[schema(example = "PIX deposit")]
    pub description: String,
    #[schema(example = 50.0)]
    pub value: f64,
    /// 默认 PENDING
    #[serde(default)]
    pub status: CreditStatus,
    /// 默认 PIX
    #[serde(default)]
    pub deposit_type: DepositType,
}

#[derive(Debug, Clone)]
pub struct UpdateCreditHistory {
    pub name: Option<String>,
    pub description: String,
    pub value: f64,
    pub status: CreditStatus,
    pub deposit_type: DepositType,
}

impl UpdateCreditHistoryRequest {
    pub fn into_input(self) -> AppResult<UpdateCreditHistory> {
        self.validate()?;
        Ok(UpdateCreditHistory {
            name: self.name,
            description: self.description,
            value: self.value,
            status: self.status,
            deposit_type: self.deposit_type,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreditHistoryResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: String,
    pub value: f64,
    pub status: CreditStatus,
    pub deposit_type: DepositType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<credit_histories::Model> for CreditHistoryResponse {
    fn from(m: credit_histories::Model) -> Self {
        CreditHistoryResponse {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            description: m.description,
            value: m.value,
            status: m.status,
            deposit_type: m.deposit_type,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
