use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use utoipa::OpenApi;

use crate::api::rest::cache::ReadCachePolicy;
use crate::api::rest::identity::IdentityProvider;
use crate::api::rest::{dto, handlers, problem};
use crate::domain::service::Service;

pub const ARTICLES_PATH: &str = "/api/articles";

/// OpenAPI document for the articles resource.
#[derive(OpenApi)]
#[openapi(
    info(title = "Articles API", description = "Article content items with an optional address"),
    paths(
        handlers::get_articles,
        handlers::create_article,
        handlers::replace_article,
        handlers::update_article,
        handlers::delete_article,
    ),
    components(schemas(
        dto::ArticleEnvelope,
        dto::ArticlePayload,
        dto::BodyPayload,
        dto::AddressPayload,
        dto::ArticleDto,
        dto::ArticleLookupDto,
        dto::AddressDto,
        dto::ArticleUpdatedDto,
        dto::MessageDto,
        problem::Problem,
    )),
    tags((name = "articles", description = "Article CRUD"))
)]
pub struct ArticlesApiDoc;

/// Mount every verb of `/api/articles` on `router`. The extensions are
/// scoped to these routes only.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    identity: Arc<dyn IdentityProvider>,
    cache: ReadCachePolicy,
) -> Router {
    // GET | POST | PUT | PATCH | DELETE /api/articles[?id=]
    let articles = Router::new()
        .route(
            ARTICLES_PATH,
            get(handlers::get_articles)
                .post(handlers::create_article)
                .put(handlers::replace_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .layer(Extension(service))
        .layer(Extension(identity))
        .layer(Extension(cache));

    router.merge(articles)
}
