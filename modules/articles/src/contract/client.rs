use async_trait::async_trait;

use crate::contract::{
    error::ArticlesError,
    model::{Article, ArticlePatch, ArticleRecord, EntityId, NewArticle, UserId},
};

/// Public API trait for the articles module that other modules can use
#[async_trait]
pub trait ArticlesApi: Send + Sync {
    /// Get an article (and its address) by id
    async fn get_article(&self, id: EntityId) -> Result<ArticleRecord, ArticlesError>;

    /// Published articles, newest first
    async fn list_articles(&self) -> Result<Vec<ArticleRecord>, ArticlesError>;

    /// Create a new article on behalf of `actor`
    async fn create_article(
        &self,
        actor: UserId,
        new_article: NewArticle,
    ) -> Result<ArticleRecord, ArticlesError>;

    /// Update an article; empty fields in `patch` are ignored
    async fn update_article(
        &self,
        actor: UserId,
        id: EntityId,
        patch: ArticlePatch,
    ) -> Result<Article, ArticlesError>;

    /// Delete an article by id
    async fn delete_article(&self, actor: UserId, id: EntityId) -> Result<(), ArticlesError>;
}
