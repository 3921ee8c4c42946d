use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditionStatus {
    #[default]
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
}

impl std::fmt::Display for EditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditionStatus::Open => write!(f, "OPEN"),
            EditionStatus::Closed => write!(f, "CLOSED"),
            EditionStatus::Finished => write!(f, "FINISHED"),
        }
    }
}

/// 销售期次实体
/// - name 唯一
/// - display_order 对应数据库列 "order", 用于列表排序
/// - image_key / image_url 为横幅图片在文件存储中的位置
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "editions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub draw_date: DateTime<Utc>,
    #[sea_orm(column_name = "order")]
    pub display_order: Option<i32>,
    pub status: EditionStatus,
    pub image_key: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::titles::Entity")]
    Titles,
    #[sea_orm(has_many = "super::draw_items::Entity")]
    DrawItems,
}

impl Related<super::titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Titles.def()
    }
}

impl Related<super::draw_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DrawItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
