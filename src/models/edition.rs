use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    EditionStatus, base_title_entity as base_titles, draw_item_entity as draw_items,
    edition_entity as editions, title_entity as titles,
};
use crate::error::{AppError, AppResult};
use crate::utils::{opt_i32_from_any, opt_string_or_number, parse_date, parse_digits};

use super::TitleResponse;

/// 未指定价格时新票据的默认售价
pub const DEFAULT_TITLE_VALUE: i64 = 5;

/// 票据名称区间 (字典序, 闭区间), 任一端可省略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRange {
    pub initial: Option<String>,
    pub end: Option<String>,
}

impl TitleRange {
    /// 两端都省略时不构成区间; 只给一端时为半开区间
    pub fn from_bounds(initial: Option<String>, end: Option<String>) -> AppResult<Option<Self>> {
        match (initial, end) {
            (None, None) => Ok(None),
            (Some(initial), Some(end)) if initial > end => Err(AppError::ValidationError(
                format!("initial_title '{initial}' must not be greater than end_title '{end}'"),
            )),
            (initial, end) => Ok(Some(TitleRange { initial, end })),
        }
    }

    pub fn between(initial: &str, end: &str) -> Self {
        TitleRange {
            initial: Some(initial.to_string()),
            end: Some(end.to_string()),
        }
    }

    /// base_titles.name 上的过滤条件, 只应用给出的端点
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(initial) = &self.initial {
            cond = cond.add(base_titles::Column::Name.gte(initial.as_str()));
        }
        if let Some(end) = &self.end {
            cond = cond.add(base_titles::Column::Name.lte(end.as_str()));
        }
        cond
    }
}

impl fmt::Display for TitleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={}",
            self.initial.as_deref().unwrap_or(""),
            self.end.as_deref().unwrap_or("")
        )
    }
}

fn parse_draw_date(raw: &str) -> AppResult<DateTime<Utc>> {
    parse_date(raw).ok_or_else(|| {
        AppError::ValidationError(format!("draw_date '{raw}' is not a valid date"))
    })
}

fn parse_value(raw: &str) -> AppResult<i64> {
    parse_digits(raw)
        .ok_or_else(|| AppError::ValidationError(format!("value '{raw}' is out of range")))
}

/// 创建期次请求 (multipart 表单字段)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEditionRequest {
    #[validate(length(min = 1, max = 255, message = "Edition name must be 1-255 characters"))]
    #[schema(example = "Edition 42")]
    pub name: String,
    #[schema(example = "2025-12-24T20:00:00Z")]
    pub draw_date: String,
    #[serde(default, deserialize_with = "opt_i32_from_any")]
    #[schema(example = 1)]
    pub order: Option<i32>,
    #[serde(default)]
    pub status: Option<EditionStatus>,
    /// 售价, 去掉非数字字符后解析, 默认 "5"
    #[serde(default, deserialize_with = "opt_string_or_number")]
    #[schema(example = "10")]
    pub value: Option<String>,
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "T0001")]
    pub initial_title: Option<String>,
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "T0100")]
    pub end_title: Option<String>,
}

/// 校验与类型转换后的创建参数
#[derive(Debug, Clone)]
pub struct CreateEdition {
    pub name: String,
    pub draw_date: DateTime<Utc>,
    pub order: Option<i32>,
    pub status: EditionStatus,
    pub value: i64,
    pub range: Option<TitleRange>,
}

impl CreateEditionRequest {
    pub fn into_input(self) -> AppResult<CreateEdition> {
        self.validate()?;

        let value = match self.value.as_deref() {
            Some(raw) => parse_value(raw)?,
            None => DEFAULT_TITLE_VALUE,
        };

        Ok(CreateEdition {
            draw_date: parse_draw_date(&self.draw_date)?,
            name: self.name,
            order: self.order,
            status: self.status.unwrap_or_default(),
            value,
            range: TitleRange::from_bounds(self.initial_title, self.end_title)?,
        })
    }
}

/// 更新期次请求, 所有字段可选, 未提供的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEditionRequest {
    #[validate(length(min = 1, max = 255, message = "Edition name must be 1-255 characters"))]
    pub name: Option<String>,
    pub draw_date: Option<String>,
    #[serde(default, deserialize_with = "opt_i32_from_any")]
    pub order: Option<i32>,
    #[serde(default)]
    pub status: Option<EditionStatus>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub value: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub initial_title: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub end_title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEdition {
    pub name: Option<String>,
    pub draw_date: Option<DateTime<Utc>>,
    pub order: Option<i32>,
    pub status: Option<EditionStatus>,
    pub value: Option<i64>,
    pub range: Option<TitleRange>,
}

impl UpdateEditionRequest {
    pub fn into_input(self) -> AppResult<UpdateEdition> {
        self.validate()?;

        Ok(UpdateEdition {
            draw_date: self.draw_date.as_deref().map(parse_draw_date).transpose()?,
            value: self.value.as_deref().map(parse_value).transpose()?,
            range: TitleRange::from_bounds(self.initial_title, self.end_title)?,
            name: self.name,
            order: self.order,
            status: self.status,
        })
    }
}

/// 批量更新中的单个期次 (仅 name / draw_date / order)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EditionPatchRequest {
    pub id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Edition name must be 1-255 characters"))]
    pub name: Option<String>,
    pub draw_date: Option<String>,
    #[serde(default, deserialize_with = "opt_i32_from_any")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateManyEditionsRequest {
    #[validate(length(min = 1, message = "At least one edition is required"), nested)]
    pub editions: Vec<EditionPatchRequest>,
}

#[derive(Debug, Clone)]
pub struct EditionPatch {
    pub id: Uuid,
    pub name: Option<String>,
    pub draw_date: Option<DateTime<Utc>>,
    pub order: Option<i32>,
}

impl UpdateManyEditionsRequest {
    pub fn into_input(self) -> AppResult<Vec<EditionPatch>> {
        self.validate()?;

        self.editions
            .into_iter()
            .map(|p| {
                Ok(EditionPatch {
                    id: p.id,
                    draw_date: p.draw_date.as_deref().map(parse_draw_date).transpose()?,
                    name: p.name,
                    order: p.order,
                })
            })
            .collect()
    }
}

/// 期次响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditionResponse {
    pub id: Uuid,
    pub name: String,
    pub draw_date: DateTime<Utc>,
    pub order: Option<i32>,
    pub status: EditionStatus,
    pub image_key: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 仅在查询包含票据时返回
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titles: Option<Vec<TitleResponse>>,
}

impl From<editions::Model> for EditionResponse {
    fn from(m: editions::Model) -> Self {
        EditionResponse {
            id: m.id,
            name: m.name,
            draw_date: m.draw_date,
            order: m.display_order,
            status: m.status,
            image_key: m.image_key,
            image_url: m.image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
            titles: None,
        }
    }
}

impl EditionResponse {
    pub fn with_titles(mut self, titles: Vec<titles::Model>) -> Self {
        self.titles = Some(titles.into_iter().map(Into::into).collect());
        self
    }
}

/// 开奖项目响应 (附带期次及其票据)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawItemResponse {
    pub id: Uuid,
    pub edition_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edition: Option<EditionResponse>,
}

impl From<draw_items::Model> for DrawItemResponse {
    fn from(m: draw_items::Model) -> Self {
        DrawItemResponse {
            id: m.id,
            edition_id: m.edition_id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            edition: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateManyEditionsResponse {
    pub updated: usize,
}

/// 删除期次响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteEditionResponse {
    pub id: Uuid,
    /// 随期次一起删除的已售票据数量
    pub deleted_titles: u64,
}
