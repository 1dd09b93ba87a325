use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ArticlesApi,
    error::ArticlesError,
    model::{Article, ArticlePatch, ArticleRecord, EntityId, NewArticle, UserId},
};
use crate::domain::service::Service;

/// Local implementation of the ArticlesApi trait that delegates to the domain service
pub struct ArticlesLocalClient {
    service: Arc<Service>,
}

impl ArticlesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ArticlesApi for ArticlesLocalClient {
    async fn get_article(&self, id: EntityId) -> Result<ArticleRecord, ArticlesError> {
        self.service.get_article(id).await.map_err(Into::into)
    }

    async fn list_articles(&self) -> Result<Vec<ArticleRecord>, ArticlesError> {
        self.service.list_articles().await.map_err(Into::into)
    }

    async fn create_article(
        &self,
        actor: UserId,
        new_article: NewArticle,
    ) -> Result<ArticleRecord, ArticlesError> {
        self.service
            .create_article(actor, new_article)
            .await
            .map_err(Into::into)
    }

    async fn update_article(
        &self,
        actor: UserId,
        id: EntityId,
        patch: ArticlePatch,
    ) -> Result<Article, ArticlesError> {
        self.service
            .update_article(actor, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_article(&self, actor: UserId, id: EntityId) -> Result<(), ArticlesError> {
        self.service
            .delete_article(actor, id)
            .await
            .map_err(Into::into)
    }
}
