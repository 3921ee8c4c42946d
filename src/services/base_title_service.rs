use crate::entities::base_title_entity as base_titles;
use crate::error::AppResult;
use crate::models::{BaseTitleResponse, PaginatedResponse, PaginationParams, TitleRange};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

#[derive(Clone)]
pub struct BaseTitleService {
    pool: DatabaseConnection,
}

impl BaseTitleService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 分页浏览票据目录, 可按名称区间过滤
    pub async fn list(
        &self,
        range: Option<TitleRange>,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<BaseTitleResponse>> {
        let mut query = base_titles::Entity::find();
        if let Some(range) = &range {
            query = query.filter(range.condition());
        }

        let total = query.clone().count(&self.pool).await? as i64;

        let list = query
            .order_by_asc(base_titles::Column::Name)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            list.into_iter().map(Into::into).collect(),
            params,
            total,
        ))
    }
}
