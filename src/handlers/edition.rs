use crate::config::StorageConfig;
use crate::error::AppResult;
use crate::external::UploadedFile;
use crate::models::*;
use crate::services::{EditionService, TitleService};
use crate::utils::read_form;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

/// 横幅图片在表单中的字段名
const IMAGE_FIELD: &str = "image";

async fn read_create_form(
    payload: Multipart,
    max_image_bytes: usize,
) -> AppResult<(CreateEdition, Option<UploadedFile>)> {
    let form = read_form(payload, IMAGE_FIELD, max_image_bytes).await?;
    let input = form.parse::<CreateEditionRequest>()?.into_input()?;
    Ok((input, form.file))
}

async fn read_update_form(
    payload: Multipart,
    max_image_bytes: usize,
) -> AppResult<(UpdateEdition, Option<UploadedFile>)> {
    let form = read_form(payload, IMAGE_FIELD, max_image_bytes).await?;
    let input = form.parse::<UpdateEditionRequest>()?.into_input()?;
    Ok((input, form.file))
}

#[utoipa::path(
    post,
    path = "/editions",
    tag = "editions",
    request_body(content = CreateEditionRequest, content_type = "multipart/form-data", description = "期次字段 + 可选 image 文件"),
    responses(
        (status = 201, description = "创建成功", body = EditionResponse),
        (status = 400, description = "参数错误"),
        (status = 409, description = "期次名称已存在"),
        (status = 502, description = "图片存储失败")
    )
)]
/// 创建期次, 并按 [initial_title, end_title] 生成票据
pub async fn create_edition(
    service: web::Data<EditionService>,
    storage_config: web::Data<StorageConfig>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let (input, image) = match read_create_form(payload, storage_config.max_image_bytes).await {
        Ok(parsed) => parsed,
        Err(e) => return Ok(e.error_response()),
    };

    match service.create(input, image).await {
        Ok(data) => Ok(HttpResponse::Created().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/editions",
    tag = "editions",
    responses(
        (status = 200, description = "期次列表 (含票据), 按 order 升序", body = [EditionResponse])
    )
)]
pub async fn list_editions(service: web::Data<EditionService>) -> Result<HttpResponse> {
    match service.find_all().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/editions/draw-items",
    tag = "editions",
    responses(
        (status = 200, description = "开放中期次的开奖项目", body = [DrawItemResponse])
    )
)]
pub async fn list_draw_items(service: web::Data<EditionService>) -> Result<HttpResponse> {
    match service.find_all_draw_items().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/editions/{id}",
    tag = "editions",
    params(
        ("id" = Uuid, Path, description = "期次ID")
    ),
    responses(
        (status = 200, description = "期次详情 (含票据)", body = EditionResponse),
        (status = 404, description = "期次不存在")
    )
)]
pub async fn get_edition(
    service: web::Data<EditionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match service.find_one(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/editions/{id}",
    tag = "editions",
    params(
        ("id" = Uuid, Path, description = "期次ID")
    ),
    request_body(content = UpdateEditionRequest, content_type = "multipart/form-data", description = "需要修改的字段 + 可选 image 文件"),
    responses(
        (status = 200, description = "更新成功, titles 仅含未售出票据", body = EditionResponse),
        (status = 400, description = "参数错误"),
        (status = 404, description = "期次不存在"),
        (status = 409, description = "期次名称已存在")
    )
)]
/// 更新期次; 提供新图片时替换并删除旧图片
pub async fn update_edition(
    service: web::Data<EditionService>,
    storage_config: web::Data<StorageConfig>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let (input, image) = match read_update_form(payload, storage_config.max_image_bytes).await {
        Ok(parsed) => parsed,
        Err(e) => return Ok(e.error_response()),
    };

    match service.update(path.into_inner(), input, image).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/editions",
    tag = "editions",
    request_body = UpdateManyEditionsRequest,
    responses(
        (status = 200, description = "批量更新成功", body = UpdateManyEditionsResponse),
        (status = 400, description = "参数错误"),
        (status = 404, description = "存在不存在的期次, 整批未写入")
    )
)]
/// 批量更新期次的 name / draw_date / order
pub async fn update_many_editions(
    service: web::Data<EditionService>,
    payload: web::Json<UpdateManyEditionsRequest>,
) -> Result<HttpResponse> {
    let patches = match payload.into_inner().into_input() {
        Ok(patches) => patches,
        Err(e) => return Ok(e.error_response()),
    };

    match service.update_many(patches).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UpdateManyEditionsResponse { updated },
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/editions/{id}",
    tag = "editions",
    params(
        ("id" = Uuid, Path, description = "期次ID")
    ),
    responses(
        (status = 200, description = "删除成功", body = DeleteEditionResponse),
        (status = 404, description = "期次不存在")
    )
)]
/// 删除期次及其已售出的票据
pub async fn delete_edition(
    service: web::Data<EditionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match service.remove(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/editions/{id}/titles",
    tag = "editions",
    params(
        ("id" = Uuid, Path, description = "期次ID"),
        ("available_only" = Option<bool>, Query, description = "仅返回未售出的票据")
    ),
    responses(
        (status = 200, description = "期次下的票据", body = [TitleResponse]),
        (status = 404, description = "期次不存在")
    )
)]
pub async fn list_edition_titles(
    service: web::Data<TitleService>,
    path: web::Path<Uuid>,
    query: web::Query<EditionTitlesQuery>,
) -> Result<HttpResponse> {
    match service
        .list_by_edition(path.into_inner(), query.available_only)
        .await
    {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn edition_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/editions")
            .route("", web::post().to(create_edition))
            .route("", web::get().to(list_editions))
            .route("", web::patch().to(update_many_editions))
            .route("/draw-items", web::get().to(list_draw_items))
            .route("/{id}", web::get().to(get_edition))
            .route("/{id}", web::patch().to(update_edition))
            .route("/{id}", web::delete().to(delete_edition))
            .route("/{id}/titles", web::get().to(list_edition_titles)),
    );
}
