use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::cache::{CacheMetadata, ReadCachePolicy};
use crate::api::rest::dto::{
    ArticleDto, ArticleEnvelope, ArticleLookupDto, ArticlePayload, ArticleQuery,
    ArticleUpdatedDto, MessageDto, ARTICLE_DELETED_MESSAGE,
};
use crate::api::rest::envelope::Envelope;
use crate::api::rest::error::{map_domain_error, map_read_error, ProblemContext};
use crate::api::rest::identity::CurrentUser;
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::EntityId;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Ids that cannot name a stored entity are reported like unknown ones.
fn parse_id(raw: Option<&str>) -> Result<EntityId, DomainError> {
    let raw = raw.unwrap_or_default();
    EntityId::parse_lookup(raw).ok_or_else(|| DomainError::article_not_found(raw))
}

/// Retrieve one article (`?id=`) or the published list
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    params(ArticleQuery),
    responses(
        (status = 200, description = "One article when `id` is given, otherwise the published articles newest first", body = ArticleLookupDto),
        (status = 404, description = "Article not found", body = Problem),
    )
)]
pub async fn get_articles(
    Extension(svc): Extension<Arc<Service>>,
    Extension(cache): Extension<ReadCachePolicy>,
    Query(query): Query<ArticleQuery>,
    ctx: ProblemContext,
) -> Result<Response, ProblemResponse> {
    let Some(raw) = query.retrieve_id() else {
        info!("Listing published articles");
        return match svc.list_articles().await {
            Ok(records) => {
                let items = records.into_iter().map(ArticleDto::from).collect();
                let body = ArticleLookupDto::List(items);
                Ok((CacheMetadata::for_article_list(cache), Json(body)).into_response())
            }
            Err(e) => {
                error!("Failed to list articles: {}", e);
                Err(map_read_error(&e, &ctx))
            }
        };
    };

    info!("Getting article with id: {}", raw);

    let result = match parse_id(Some(raw)) {
        Ok(id) => svc.get_article(id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(record) => {
            let meta = CacheMetadata::for_article(record.article.id, cache);
            let body = ArticleLookupDto::One(ArticleDto::from(record));
            Ok((meta, Json(body)).into_response())
        }
        Err(e) => {
            warn!("Failed to get article {}: {}", raw, e);
            Err(map_read_error(&e, &ctx))
        }
    }
}

/// Create a new article
#[utoipa::path(
    post,
    path = "/api/articles",
    tag = "articles",
    request_body = ArticleEnvelope,
    responses(
        (status = 201, description = "Article created", body = ArticleDto),
        (status = 400, description = "Body is not a JSON `data` envelope", body = Problem),
        (status = 403, description = "Acting user may not create articles", body = Problem),
    )
)]
pub async fn create_article(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    ctx: ProblemContext,
    Envelope(payload): Envelope<ArticlePayload>,
) -> Result<(StatusCode, Json<ArticleDto>), ProblemResponse> {
    info!("Creating article as user {}", actor);

    match svc.create_article(actor, payload.into()).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(ArticleDto::from(record)))),
        Err(e) => {
            warn!("Failed to create article: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Replace an article's title, body and name
#[utoipa::path(
    put,
    path = "/api/articles",
    tag = "articles",
    params(ArticleQuery),
    request_body = ArticleEnvelope,
    responses(
        (status = 200, description = "Article updated", body = ArticleUpdatedDto),
        (status = 400, description = "Body is not a JSON `data` envelope", body = Problem),
        (status = 403, description = "Acting user may not update articles", body = Problem),
        (status = 404, description = "Article not found", body = Problem),
    )
)]
pub async fn replace_article(
    svc: Extension<Arc<Service>>,
    user: CurrentUser,
    query: Query<ArticleQuery>,
    ctx: ProblemContext,
    body: Envelope<ArticlePayload>,
) -> Result<Json<ArticleUpdatedDto>, ProblemResponse> {
    apply_update(svc, user, query, ctx, body).await
}

/// Partially update an article; empty fields are left untouched
#[utoipa::path(
    patch,
    path = "/api/articles",
    tag = "articles",
    params(ArticleQuery),
    request_body = ArticleEnvelope,
    responses(
        (status = 200, description = "Article updated", body = ArticleUpdatedDto),
        (status = 400, description = "Body is not a JSON `data` envelope", body = Problem),
        (status = 403, description = "Acting user may not update articles", body = Problem),
        (status = 404, description = "Article not found", body = Problem),
    )
)]
pub async fn update_article(
    svc: Extension<Arc<Service>>,
    user: CurrentUser,
    query: Query<ArticleQuery>,
    ctx: ProblemContext,
    body: Envelope<ArticlePayload>,
) -> Result<Json<ArticleUpdatedDto>, ProblemResponse> {
    apply_update(svc, user, query, ctx, body).await
}

async fn apply_update(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ArticleQuery>,
    ctx: ProblemContext,
    Envelope(payload): Envelope<ArticlePayload>,
) -> Result<Json<ArticleUpdatedDto>, ProblemResponse> {
    info!("Updating article with id: {:?}", query.id);

    let result = match parse_id(query.lookup_id()) {
        Ok(id) => svc.update_article(actor, id, payload.into()).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(article) => Ok(Json(ArticleUpdatedDto::from(article))),
        Err(e) => {
            warn!("Failed to update article {:?}: {}", query.id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete an article; its address is kept
#[utoipa::path(
    delete,
    path = "/api/articles",
    tag = "articles",
    params(ArticleQuery),
    responses(
        (status = 204, description = "Article deleted", body = MessageDto),
        (status = 403, description = "Acting user may not delete articles", body = Problem),
        (status = 404, description = "Article not found", body = Problem),
    )
)]
pub async fn delete_article(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ArticleQuery>,
    ctx: ProblemContext,
) -> Result<(StatusCode, Json<MessageDto>), ProblemResponse> {
    info!("Deleting article with id: {:?}", query.id);

    let result = match parse_id(query.lookup_id()) {
        Ok(id) => svc.delete_article(actor, id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Ok((
            StatusCode::NO_CONTENT,
            Json(MessageDto::new(ARTICLE_DELETED_MESSAGE)),
        )),
        Err(e) => {
            warn!("Failed to delete article {:?}: {}", query.id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}
