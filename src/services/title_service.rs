use crate::entities::{
    buyed_title_entity as buyed_titles, edition_entity as editions, title_entity as titles,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{TitleDetailResponse, TitleIncludes, TitleResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

#[derive(Clone)]
pub struct TitleService {
    pool: DatabaseConnection,
}

impl TitleService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 票据详情; user / buyed_title 仅在 includes 中请求时才查询
    pub async fn find_one(
        &self,
        id: Uuid,
        includes: TitleIncludes,
    ) -> AppResult<TitleDetailResponse> {
        let title = titles::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Title {id} not found")))?;

        let user = if includes.user {
            title
                .find_related(users::Entity)
                .one(&self.pool)
                .await?
                .map(Into::into)
        } else {
            None
        };

        let buyed_title = if includes.buyed_title {
            title
                .find_related(buyed_titles::Entity)
                .one(&self.pool)
                .await?
                .map(Into::into)
        } else {
            None
        };

        Ok(TitleDetailResponse {
            title: title.into(),
            user,
            buyed_title,
        })
    }

    /// 期次下的票据, available_only 时只返回未售出且未删除的
    pub async fn list_by_edition(
        &self,
        edition_id: Uuid,
        available_only: bool,
    ) -> AppResult<Vec<TitleResponse>> {
        editions::Entity::find_by_id(edition_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Edition {edition_id} not found")))?;

        let mut query = titles::Entity::find().filter(titles::Column::EditionId.eq(edition_id));
        if available_only {
            query = query
                .filter(titles::Column::UserId.is_null())
                .filter(titles::Column::Deleted.eq(false));
        }

        let list = query
            .order_by_asc(titles::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EditionStatus, PaymentForm, PaymentStatus};
    use crate::models::{CreateEdition, TitleRange};
    use crate::services::EditionService;
    use crate::test_support::{
        MemoryStorage, seed_base_titles, seed_buyed_title, seed_user, setup_db,
    };
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
    use std::sync::Arc;

    async fn setup() -> (DatabaseConnection, TitleService, Uuid, Vec<titles::Model>) {
        let db = setup_db().await;
        seed_base_titles(&db, &["T0001", "T0002", "T0003"]).await;
        let editions = EditionService::new(db.clone(), Arc::new(MemoryStorage::default()), false);
        let edition = editions
            .create(
                CreateEdition {
                    name: "Edition 1".to_string(),
                    draw_date: Utc::now(),
                    order: None,
                    status: EditionStatus::Open,
                    value: 10,
                    range: Some(TitleRange::between("T0001", "T0003")),
                },
                None,
            )
            .await
            .unwrap();
        let list = titles::Entity::find()
            .filter(titles::Column::EditionId.eq(edition.id))
            .order_by_asc(titles::Column::Name)
            .all(&db)
            .await
            .unwrap();
        (db.clone(), TitleService::new(db), edition.id, list)
    }

    #[tokio::test]
    async fn test_find_one_with_includes() {
        let (db, service, _edition_id, list) = setup().await;
        let user = seed_user(&db, "Ana").await;
        let buyed = seed_buyed_title(&db, user.id, PaymentForm::Balance).await;

        let mut model = list[0].clone().into_active_model();
        model.user_id = Set(Some(user.id));
        model.buyed_title_id = Set(Some(buyed.id));
        let sold = model.update(&db).await.unwrap();

        let plain = service
            .find_one(sold.id, TitleIncludes::default())
            .await
            .unwrap();
        assert!(plain.user.is_none());
        assert!(plain.buyed_title.is_none());
        assert_eq!(plain.title.user_id, Some(user.id));

        let full = service
            .find_one(
                sold.id,
                TitleIncludes {
                    user: true,
                    buyed_title: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(full.user.unwrap().name, "Ana");
        let purchase = full.buyed_title.unwrap();
        assert_eq!(purchase.id, buyed.id);
        assert_eq!(purchase.payment_status, PaymentStatus::Done);
    }

    #[tokio::test]
    async fn test_find_one_unsold_with_includes() {
        let (_db, service, _edition_id, list) = setup().await;
        let detail = service
            .find_one(
                list[1].id,
                TitleIncludes {
                    user: true,
                    buyed_title: true,
                },
            )
            .await
            .unwrap();
        assert!(detail.user.is_none());
        assert!(detail.buyed_title.is_none());
        assert_eq!(detail.title.name, "T0002");
    }

    #[tokio::test]
    async fn test_find_one_missing() {
        let (_db, service, _edition_id, _list) = setup().await;
        assert!(matches!(
            service.find_one(Uuid::new_v4(), TitleIncludes::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_edition() {
        let (db, service, edition_id, list) = setup().await;
        let user = seed_user(&db, "Ana").await;
        let mut model = list[0].clone().into_active_model();
        model.user_id = Set(Some(user.id));
        model.update(&db).await.unwrap();
        let mut model = list[2].clone().into_active_model();
        model.deleted = Set(true);
        model.update(&db).await.unwrap();

        assert_eq!(service.list_by_edition(edition_id, false).await.unwrap().len(), 3);

        let available = service.list_by_edition(edition_id, true).await.unwrap();
        let names: Vec<&str> = available.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["T0002"]);

        assert!(matches!(
            service.list_by_edition(Uuid::new_v4(), false).await,
            Err(AppError::NotFound(_))
        ));
    }
}
