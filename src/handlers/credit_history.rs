use crate::models::*;
use crate::services::CreditHistoryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/credit-history/{id}",
    tag = "credit_history",
    params(
        ("id" = Uuid, Path, description = "充值记录ID")
    ),
    responses(
        (status = 200, description = "充值记录", body = CreditHistoryResponse),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn get_credit_history(
    service: web::Data<CreditHistoryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match service.find_one(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/credit-history/{id}",
    tag = "credit_history",
    params(
        ("id" = Uuid, Path, description = "充值记录ID")
    ),
    request_body = UpdateCreditHistoryRequest,
    responses(
        (status = 200, description = "更新成功", body = CreditHistoryResponse),
        (status = 400, description = "参数错误"),
        (status = 404, description = "记录不存在")
    )
)]
/// 更新充值记录, status 默认 PENDING, deposit_type 默认 PIX
pub async fn update_credit_history(
    service: web::Data<CreditHistoryService>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateCreditHistoryRequest>,
) -> Result<HttpResponse> {
    let input = match payload.into_inner().into_input() {
        Ok(input) => input,
        Err(e) => return Ok(e.error_response()),
    };

    match service.update(path.into_inner(), input).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn credit_history_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/credit-history")
            .route("/{id}", web::get().to(get_credit_history))
            .route("/{id}", web::patch().to(update_credit_history)),
    );
}
