use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CreditStatus, DepositType, EditionStatus, PaymentForm, PaymentStatus};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::edition::create_edition,
        handlers::edition::list_editions,
        handlers::edition::list_draw_items,
        handlers::edition::get_edition,
        handlers::edition::update_edition,
        handlers::edition::update_many_editions,
        handlers::edition::delete_edition,
        handlers::edition::list_edition_titles,
        handlers::title::get_title,
        handlers::title::list_base_titles,
        handlers::credit_history::get_credit_history,
        handlers::credit_history::update_credit_history,
    ),
    components(
        schemas(
            EditionStatus,
            CreateEditionRequest,
            UpdateEditionRequest,
            EditionPatchRequest,
            UpdateManyEditionsRequest,
            UpdateManyEditionsResponse,
            EditionResponse,
            DrawItemResponse,
            DeleteEditionResponse,
            TitleResponse,
            TitleOwnerResponse,
            BuyedTitleResponse,
            TitleDetailResponse,
            PaymentForm,
            PaymentStatus,
            BaseTitleResponse,
            BaseTitlePage,
            CreditStatus,
            DepositType,
            UpdateCreditHistoryRequest,
            CreditHistoryResponse,
            ApiError,
        )
    ),
    tags(
        (name = "editions", description = "Edition management API"),
        (name = "titles", description = "Title and title catalog API"),
        (name = "credit_history", description = "Credit history API"),
    ),
    info(
        title = "Raffle Editions API",
        version = "1.0.0",
        description = "Raffle editions backend REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_edition_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/editions",
            "/editions/draw-items",
            "/editions/{id}",
            "/editions/{id}/titles",
            "/titles/{id}",
            "/base-titles",
            "/credit-history/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
