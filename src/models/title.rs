use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{
    PaymentForm, PaymentStatus, base_title_entity as base_titles,
    buyed_title_entity as buyed_titles, title_entity as titles, user_entity as users,
};

/// 票据响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TitleResponse {
    pub id: Uuid,
    pub edition_id: Uuid,
    #[schema(example = "T0001")]
    pub name: String,
    pub dozens: Vec<String>,
    pub bar_code: String,
    pub qr_code: String,
    pub chances: i32,
    pub value: i64,
    pub user_id: Option<Uuid>,
    pub buyed_title_id: Option<Uuid>,
    pub payment_id: Option<String>,
    /// 已有购买记录
    pub sold: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<titles::Model> for TitleResponse {
    fn from(m: titles::Model) -> Self {
        TitleResponse {
            sold: m.is_sold(),
            id: m.id,
            edition_id: m.edition_id,
            name: m.name,
            dozens: m.dozens.0,
            bar_code: m.bar_code,
            qr_code: m.qr_code,
            chances: m.chances,
            value: m.value,
            user_id: m.user_id,
            buyed_title_id: m.buyed_title_id,
            payment_id: m.payment_id,
            deleted: m.deleted,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 票据持有人 (按需加载)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TitleOwnerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

impl From<users::Model> for TitleOwnerResponse {
    fn from(m: users::Model) -> Self {
        TitleOwnerResponse {
            id: m.id,
            name: m.name,
            email: m.email,
        }
    }
}

/// 购买记录 (按需加载)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BuyedTitleResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_form: PaymentForm,
    /// 由支付方式推导的结算状态
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub total_value: i64,
    pub created_at: DateTime<Utc>,
}

impl From<buyed_titles::Model> for BuyedTitleResponse {
    fn from(m: buyed_titles::Model) -> Self {
        BuyedTitleResponse {
            id: m.id,
            user_id: m.user_id,
            payment_status: m.payment_form.settlement_status(),
            payment_form: m.payment_form,
            payment_id: m.payment_id,
            total_value: m.total_value,
            created_at: m.created_at,
        }
    }
}

/// 票据详情, user / buyed_title 仅在 include 中请求时填充
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TitleDetailResponse {
    #[serde(flatten)]
    pub title: TitleResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<TitleOwnerResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyed_title: Option<BuyedTitleResponse>,
}

/// 需要加载的关联
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleIncludes {
    pub user: bool,
    pub buyed_title: bool,
}

impl TitleIncludes {
    /// 解析逗号分隔的 include 参数, 例如 "user,buyed_title"; 未知项忽略
    pub fn parse(raw: Option<&str>) -> Self {
        let mut includes = TitleIncludes::default();
        for part in raw.unwrap_or_default().split(',') {
            match part.trim() {
                "user" => includes.user = true,
                "buyed_title" => includes.buyed_title = true,
                _ => {}
            }
        }
        includes
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TitleQuery {
    /// 逗号分隔: user, buyed_title
    pub include: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EditionTitlesQuery {
    /// 仅返回未售出的票据
    #[serde(default)]
    pub available_only: bool,
}

/// 票据目录响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BaseTitleResponse {
    pub id: Uuid,
    pub name: String,
    pub dozens: Vec<String>,
    pub bar_code: String,
    pub qr_code: String,
    pub chances: i32,
}

impl From<base_titles::Model> for BaseTitleResponse {
    fn from(m: base_titles::Model) -> Self {
        BaseTitleResponse {
            id: m.id,
            name: m.name,
            dozens: m.dozens.0,
            bar_code: m.bar_code,
            qr_code: m.qr_code,
            chances: m.chances,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BaseTitleQuery {
    pub initial_title: Option<String>,
    pub end_title: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
