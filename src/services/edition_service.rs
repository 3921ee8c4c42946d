use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    EditionStatus, base_title_entity as base_titles, draw_item_entity as draw_items,
    edition_entity as editions, title_entity as titles,
};
use crate::error::{AppError, AppResult};
use crate::external::{SharedStorage, StoredFile, UploadedFile, upload_optional};
use crate::models::{
    CreateEdition, DEFAULT_TITLE_VALUE, DeleteEditionResponse, DrawItemResponse, EditionPatch,
    EditionResponse, TitleRange, UpdateEdition,
};

/// IN (...) 列表与批量插入的分块大小, 保持在驱动参数上限以内
const CHUNK_SIZE: usize = 500;

/// 票据对账结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// 已存在并关联到期次的票据
    pub linked: usize,
    /// 新创建的票据
    pub created: usize,
}

#[derive(Clone)]
pub struct EditionService {
    pool: DatabaseConnection,
    storage: SharedStorage,
    /// true: 只在本期次内按名称匹配已存在的票据; false: 跨期次匹配
    scope_titles_to_edition: bool,
}

impl EditionService {
    pub fn new(
        pool: DatabaseConnection,
        storage: SharedStorage,
        scope_titles_to_edition: bool,
    ) -> Self {
        Self {
            pool,
            storage,
            scope_titles_to_edition,
        }
    }

    /// 创建期次
    ///
    /// 1. 名称重复直接返回 Conflict (此时尚未上传图片)
    /// 2. 上传横幅图片 (可选)
    /// 3. 事务内写入期次并按区间对账票据
    /// 4. 事务失败时删除刚上传的图片
    pub async fn create(
        &self,
        input: CreateEdition,
        image: Option<UploadedFile>,
    ) -> AppResult<EditionResponse> {
        let txn = self.pool.begin().await?;
        Self::ensure_name_available(&txn, &input.name, None).await?;

        let stored = upload_optional(self.storage.as_ref(), image).await?;

        match self.create_in_txn(txn, &input, stored.as_ref()).await {
            Ok(edition) => {
                log::info!("Created edition {} ({})", edition.name, edition.id);
                Ok(edition.into())
            }
            Err(e) => {
                self.discard_upload(stored.as_ref()).await;
                Err(e)
            }
        }
    }

    async fn create_in_txn(
        &self,
        txn: DatabaseTransaction,
        input: &CreateEdition,
        stored: Option<&StoredFile>,
    ) -> AppResult<editions::Model> {
        let now = Utc::now();
        let edition = editions::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            draw_date: Set(input.draw_date),
            display_order: Set(input.order),
            status: Set(input.status),
            image_key: Set(stored.map(|f| f.key.clone())),
            image_url: Set(stored.map(|f| f.url.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some(range) = &input.range {
            self.reconcile_titles(&txn, edition.id, range, Some(input.value))
                .await?;
        }

        txn.commit().await?;
        Ok(edition)
    }

    /// 所有期次及其票据, 按 order 升序
    pub async fn find_all(&self) -> AppResult<Vec<EditionResponse>> {
        let list = editions::Entity::find()
            .order_by_asc(editions::Column::DisplayOrder)
            .order_by_asc(editions::Column::Id)
            .all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = list.iter().map(|e| e.id).collect();
        let mut titles_by_edition = Self::load_titles_by_edition(&self.pool, &ids).await?;

        Ok(list
            .into_iter()
            .map(|e| {
                let titles = titles_by_edition.remove(&e.id).unwrap_or_default();
                EditionResponse::from(e).with_titles(titles)
            })
            .collect())
    }

    /// 开放中期次的开奖项目, 按创建时间升序, 附带期次及票据
    pub async fn find_all_draw_items(&self) -> AppResult<Vec<DrawItemResponse>> {
        let items = draw_items::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                draw_items::Relation::Edition.def(),
            )
            .filter(editions::Column::Status.eq(EditionStatus::Open))
            .order_by_asc(draw_items::Column::CreatedAt)
            .order_by_asc(draw_items::Column::Id)
            .all(&self.pool)
            .await?;

        let edition_ids: Vec<Uuid> = items
            .iter()
            .map(|i| i.edition_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut editions_by_id: HashMap<Uuid, editions::Model> = HashMap::new();
        for chunk in edition_ids.chunks(CHUNK_SIZE) {
            for edition in editions::Entity::find()
                .filter(editions::Column::Id.is_in(chunk.to_vec()))
                .all(&self.pool)
                .await?
            {
                editions_by_id.insert(edition.id, edition);
            }
        }
        let titles_by_edition = Self::load_titles_by_edition(&self.pool, &edition_ids).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let edition = editions_by_id.get(&item.edition_id).cloned().map(|e| {
                    let titles = titles_by_edition.get(&e.id).cloned().unwrap_or_default();
                    EditionResponse::from(e).with_titles(titles)
                });
                let mut response = DrawItemResponse::from(item);
                response.edition = edition;
                response
            })
            .collect())
    }

    /// 单个期次及其票据
    pub async fn find_one(&self, id: Uuid) -> AppResult<EditionResponse> {
        let edition = Self::find_edition(&self.pool, id).await?;
        let titles = titles::Entity::find()
            .filter(titles::Column::EditionId.eq(id))
            .order_by_asc(titles::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(EditionResponse::from(edition).with_titles(titles))
    }

    /// 更新期次
    ///
    /// 未提供的字段保持不变; 提供区间时重新对账票据;
    /// 上传了新图片时, 事务提交后删除旧图片。
    /// 返回的 titles 仅包含未售出的票据
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateEdition,
        image: Option<UploadedFile>,
    ) -> AppResult<EditionResponse> {
        let txn = self.pool.begin().await?;
        let edition = Self::find_edition(&txn, id).await?;
        if let Some(name) = &input.name
            && name != &edition.name
        {
            Self::ensure_name_available(&txn, name, Some(id)).await?;
        }

        let stored = upload_optional(self.storage.as_ref(), image).await?;
        let previous_key = edition.image_key.clone();

        match self.update_in_txn(txn, edition, &input, stored.as_ref()).await {
            Ok(response) => {
                if let Some(new_file) = &stored
                    && let Some(old_key) = previous_key
                    && old_key != new_file.key
                {
                    self.delete_quietly(&old_key).await;
                }
                log::info!("Updated edition {}", id);
                Ok(response)
            }
            Err(e) => {
                self.discard_upload(stored.as_ref()).await;
                Err(e)
            }
        }
    }

    async fn update_in_txn(
        &self,
        txn: DatabaseTransaction,
        edition: editions::Model,
        input: &UpdateEdition,
        stored: Option<&StoredFile>,
    ) -> AppResult<EditionResponse> {
        let id = edition.id;
        let mut model = edition.into_active_model();
        if let Some(name) = &input.name {
            model.name = Set(name.clone());
        }
        if let Some(draw_date) = input.draw_date {
            model.draw_date = Set(draw_date);
        }
        if let Some(order) = input.order {
            model.display_order = Set(Some(order));
        }
        if let Some(status) = input.status {
            model.status = Set(status);
        }
        if let Some(file) = stored {
            model.image_key = Set(Some(file.key.clone()));
            model.image_url = Set(Some(file.url.clone()));
        }
        model.updated_at = Set(Utc::now());
        let updated = model.update(&txn).await?;

        if let Some(range) = &input.range {
            self.reconcile_titles(&txn, id, range, input.value).await?;
        }

        let unsold = titles::Entity::find()
            .filter(titles::Column::EditionId.eq(id))
            .filter(titles::Column::UserId.is_null())
            .order_by_asc(titles::Column::Name)
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok(EditionResponse::from(updated).with_titles(unsold))
    }

    /// 批量更新 name / draw_date / order, 任一 id 不存在则整批回滚
    pub async fn update_many(&self, patches: Vec<EditionPatch>) -> AppResult<usize> {
        let txn = self.pool.begin().await?;

        for patch in &patches {
            let edition = Self::find_edition(&txn, patch.id).await?;
            if let Some(name) = &patch.name
                && name != &edition.name
            {
                Self::ensure_name_available(&txn, name, Some(patch.id)).await?;
            }

            let mut model = edition.into_active_model();
            if let Some(name) = &patch.name {
                model.name = Set(name.clone());
            }
            if let Some(draw_date) = patch.draw_date {
                model.draw_date = Set(draw_date);
            }
            if let Some(order) = patch.order {
                model.display_order = Set(Some(order));
            }
            model.updated_at = Set(Utc::now());
            model.update(&txn).await?;
        }

        txn.commit().await?;
        log::info!("Bulk updated {} editions", patches.len());
        Ok(patches.len())
    }

    /// 删除期次及其已售出的票据; 未售出的票据保留
    pub async fn remove(&self, id: Uuid) -> AppResult<DeleteEditionResponse> {
        let txn = self.pool.begin().await?;
        Self::find_edition(&txn, id).await?;

        editions::Entity::delete_by_id(id).exec(&txn).await?;
        let deleted = titles::Entity::delete_many()
            .filter(titles::Column::EditionId.eq(id))
            .filter(titles::Column::BuyedTitleId.is_not_null())
            .exec(&txn)
            .await?;

        txn.commit().await?;
        log::info!(
            "Deleted edition {} with {} purchased titles",
            id,
            deleted.rows_affected
        );

        Ok(DeleteEditionResponse {
            id,
            deleted_titles: deleted.rows_affected,
        })
    }

    /// 按名称区间对账票据
    ///
    /// (a) 取区间内的 base_titles
    /// (b) 按名称查找已存在的 titles (每个名称保留一条, 优先本期次)
    /// (c) 差集 = 区间名称 - 已存在名称
    /// (d) 已存在的票据关联到本期次, 提供 value 时覆盖售价
    /// (e) 为差集创建新票据
    async fn reconcile_titles<C: ConnectionTrait>(
        &self,
        conn: &C,
        edition_id: Uuid,
        range: &TitleRange,
        value: Option<i64>,
    ) -> AppResult<ReconcileOutcome> {
        let base = base_titles::Entity::find()
            .filter(range.condition())
            .order_by_asc(base_titles::Column::Name)
            .all(conn)
            .await?;

        if base.is_empty() {
            log::warn!(
                "No base titles in range {} for edition {}",
                range, edition_id
            );
            return Ok(ReconcileOutcome::default());
        }

        let names: Vec<String> = base.iter().map(|b| b.name.clone()).collect();
        let mut existing: HashMap<String, titles::Model> = HashMap::new();
        for chunk in names.chunks(CHUNK_SIZE) {
            let mut query =
                titles::Entity::find().filter(titles::Column::Name.is_in(chunk.to_vec()));
            if self.scope_titles_to_edition {
                query = query.filter(titles::Column::EditionId.eq(edition_id));
            }
            for title in query
                .order_by_asc(titles::Column::CreatedAt)
                .all(conn)
                .await?
            {
                let keep = match existing.get(&title.name) {
                    None => true,
                    Some(kept) => kept.edition_id != edition_id && title.edition_id == edition_id,
                };
                if keep {
                    existing.insert(title.name.clone(), title);
                }
            }
        }

        let now = Utc::now();
        let existing_ids: Vec<Uuid> = existing.values().map(|t| t.id).collect();
        for chunk in existing_ids.chunks(CHUNK_SIZE) {
            let mut update = titles::Entity::update_many()
                .col_expr(titles::Column::EditionId, Expr::value(edition_id))
                .col_expr(titles::Column::UpdatedAt, Expr::value(now));
            if let Some(value) = value {
                update = update.col_expr(titles::Column::Value, Expr::value(value));
            }
            update
                .filter(titles::Column::Id.is_in(chunk.to_vec()))
                .exec(conn)
                .await?;
        }

        let missing: Vec<titles::ActiveModel> = base
            .into_iter()
            .filter(|b| !existing.contains_key(&b.name))
            .map(|b| titles::ActiveModel {
                id: Set(Uuid::new_v4()),
                edition_id: Set(edition_id),
                name: Set(b.name),
                dozens: Set(b.dozens),
                bar_code: Set(b.bar_code),
                qr_code: Set(b.qr_code),
                chances: Set(b.chances),
                value: Set(value.unwrap_or(DEFAULT_TITLE_VALUE)),
                user_id: Set(None),
                buyed_title_id: Set(None),
                payment_id: Set(None),
                deleted: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .collect();

        for chunk in missing.chunks(CHUNK_SIZE) {
            titles::Entity::insert_many(chunk.to_vec())
                .exec_without_returning(conn)
                .await?;
        }

        let outcome = ReconcileOutcome {
            linked: existing_ids.len(),
            created: missing.len(),
        };
        log::info!(
            "Edition {}: linked {} existing titles, created {} titles in range {}",
            edition_id, outcome.linked, outcome.created, range
        );
        Ok(outcome)
    }

    async fn load_titles_by_edition<C: ConnectionTrait>(
        conn: &C,
        edition_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<titles::Model>>> {
        let mut grouped: HashMap<Uuid, Vec<titles::Model>> = HashMap::new();
        for chunk in edition_ids.chunks(CHUNK_SIZE) {
            let list = titles::Entity::find()
                .filter(titles::Column::EditionId.is_in(chunk.to_vec()))
                .order_by_asc(titles::Column::Name)
                .all(conn)
                .await?;
            for title in list {
                grouped.entry(title.edition_id).or_default().push(title);
            }
        }
        Ok(grouped)
    }

    async fn find_edition<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<editions::Model> {
        editions::Entity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Edition {id} not found")))
    }

    async fn ensure_name_available<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let mut query = editions::Entity::find().filter(editions::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(editions::Column::Id.ne(id));
        }
        if query.one(conn).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Edition with name '{name}' already exists"
            )));
        }
        Ok(())
    }

    async fn discard_upload(&self, stored: Option<&StoredFile>) {
        if let Some(file) = stored {
            self.delete_quietly(&file.key).await;
        }
    }

    async fn delete_quietly(&self, key: &str) {
        if let Err(e) = self.storage.delete_file(key).await {
            log::warn!("Failed to delete stored file {}: {}", key, e);
        }
    }
}
