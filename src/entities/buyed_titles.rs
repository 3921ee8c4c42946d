use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 支付方式
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentForm {
    #[sea_orm(string_value = "BALANCE")]
    Balance,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    #[sea_orm(string_value = "CREDIT_CARD")]
    CreditCard,
    #[sea_orm(string_value = "PIX")]
    Pix,
    #[sea_orm(string_value = "DEBIT")]
    Debit,
}

/// 支付结算状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Done,
    Pending,
}

impl PaymentForm {
    /// 余额 / 站内信用支付即时完成, 其余需等待外部支付确认
    pub fn settlement_status(&self) -> PaymentStatus {
        match self {
            PaymentForm::Balance | PaymentForm::Credit => PaymentStatus::Done,
            PaymentForm::CreditCard | PaymentForm::Pix | PaymentForm::Debit => {
                PaymentStatus::Pending
            }
        }
    }
}

/// 购买记录实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "buyed_titles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_form: PaymentForm,
    pub payment_id: Option<String>,
    pub total_value: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::titles::Entity")]
    Titles,
}

impl Related<super::titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Titles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
