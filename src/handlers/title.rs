use crate::models::*;
use crate::services::{BaseTitleService, TitleService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/titles/{id}",
    tag = "titles",
    params(
        ("id" = Uuid, Path, description = "票据ID"),
        ("include" = Option<String>, Query, description = "逗号分隔的关联: user, buyed_title")
    ),
    responses(
        (status = 200, description = "票据详情", body = TitleDetailResponse),
        (status = 404, description = "票据不存在")
    )
)]
/// 票据详情, 持有人与购买记录按 include 参数加载
pub async fn get_title(
    service: web::Data<TitleService>,
    path: web::Path<Uuid>,
    query: web::Query<TitleQuery>,
) -> Result<HttpResponse> {
    let includes = TitleIncludes::parse(query.include.as_deref());
    match service.find_one(path.into_inner(), includes).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/base-titles",
    tag = "titles",
    params(
        ("initial_title" = Option<String>, Query, description = "区间起点 (含)"),
        ("end_title" = Option<String>, Query, description = "区间终点 (含)"),
        ("page" = Option<i64>, Query, description = "页码 (默认1)"),
        ("page_size" = Option<i64>, Query, description = "每页数量 (默认50, 最大500)")
    ),
    responses(
        (status = 200, description = "票据目录", body = BaseTitlePage),
        (status = 400, description = "区间参数错误")
    )
)]
/// 分页浏览票据目录
pub async fn list_base_titles(
    service: web::Data<BaseTitleService>,
    query: web::Query<BaseTitleQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let range = match TitleRange::from_bounds(query.initial_title, query.end_title) {
        Ok(range) => range,
        Err(e) => return Ok(e.error_response()),
    };
    let params = PaginationParams::new(query.page, query.page_size);

    match service.list(range, &params).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn title_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/titles/{id}", web::get().to(get_title))
        .route("/base-titles", web::get().to(list_base_titles));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EditionStatus, PaymentForm, title_entity as titles};
    use crate::test_support::{seed_base_titles, seed_buyed_title, seed_edition, seed_user, setup_db};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_get_title_with_includes() {
        let db = setup_db().await;
        let edition = seed_edition(&db, "Edition 1", EditionStatus::Open, None).await;
        let user = seed_user(&db, "Ana").await;
        let buyed = seed_buyed_title(&db, user.id, PaymentForm::Pix).await;
        let now = Utc::now();
        let title = titles::ActiveModel {
            id: Set(Uuid::new_v4()),
            edition_id: Set(edition.id),
            name: Set("T0001".to_string()),
            dozens: Set(vec!["07".to_string()].into()),
            bar_code: Set("BAR".to_string()),
            qr_code: Set("QR".to_string()),
            chances: Set(1),
            value: Set(5),
            user_id: Set(Some(user.id)),
            buyed_title_id: Set(Some(buyed.id)),
            payment_id: Set(None),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(TitleService::new(db.clone())))
                .configure(title_config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/titles/{}?include=user,buyed_title", title.id))
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["data"]["name"], "T0001");
        assert_eq!(json["data"]["user"]["name"], "Ana");
        assert_eq!(json["data"]["buyed_title"]["payment_form"], "PIX");
        assert_eq!(json["data"]["buyed_title"]["payment_status"], "PENDING");

        let req = test::TestRequest::get()
            .uri(&format!("/titles/{}", title.id))
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert!(json["data"].get("user").is_none());
        assert!(json["data"].get("buyed_title").is_none());
    }

    #[actix_web::test]
    async fn test_list_base_titles() {
        let db = setup_db().await;
        seed_base_titles(&db, &["T0001", "T0002", "T0003"]).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(BaseTitleService::new(db.clone())))
                .configure(title_config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/base-titles?initial_title=T0002&end_title=T0003&page_size=1")
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(json["data"]["total_pages"], 2);
        assert_eq!(json["data"]["data"][0]["name"], "T0002");

        let req = test::TestRequest::get()
            .uri("/base-titles?initial_title=T0002")
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["data"]["total"], 2);

        let req = test::TestRequest::get()
            .uri("/base-titles?end_title=T0001")
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["data"][0]["name"], "T0001");

        let req = test::TestRequest::get()
            .uri("/base-titles?page=9223372036854775807")
            .to_request();
        let json: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["data"]["total"], 3);
        assert_eq!(json["data"]["data"].as_array().unwrap().len(), 0);

        let req = test::TestRequest::get()
            .uri("/base-titles?initial_title=T0003&end_title=T0001")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
