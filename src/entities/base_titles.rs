use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 票据号码组 (以 JSON 数组存储)
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Dozens(pub Vec<String>);

impl From<Vec<String>> for Dozens {
    fn from(v: Vec<String>) -> Self {
        Dozens(v)
    }
}

/// 票据目录实体
/// - 与期次无关的模板数据, 独立导入
/// - name 按字典序排序, 期次通过 [initial_title, end_title] 区间选取
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "base_titles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub dozens: Dozens,
    pub bar_code: String,
    pub qr_code: String,
    pub chances: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
