use super::base_titles::Dozens;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 可售票据实体
/// 说明:
/// - name/dozens/bar_code/qr_code/chances 创建时从 base_titles 复制
/// - user_id / buyed_title_id 在购买后写入, 对应的 User / BuyedTitle 按需加载
/// - edition_id 无外键约束: 删除期次后未售出票据仍保留原 edition_id
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "titles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub edition_id: Uuid,
    pub name: String,
    pub dozens: Dozens,
    pub bar_code: String,
    pub qr_code: String,
    pub chances: i32,
    /// 售价
    pub value: i64,
    pub user_id: Option<Uuid>,
    pub buyed_title_id: Option<Uuid>,
    pub payment_id: Option<String>,
    /// 软删除标记
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_sold(&self) -> bool {
        self.buyed_title_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::editions::Entity",
        from = "Column::EditionId",
        to = "super::editions::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Edition,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::buyed_titles::Entity",
        from = "Column::BuyedTitleId",
        to = "super::buyed_titles::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    BuyedTitle,
}

impl Related<super::editions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Edition.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::buyed_titles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuyedTitle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
