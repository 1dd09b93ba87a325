use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::{debug, info, instrument, warn};

use crate::contract::model::{
    Address, Article, ArticlePatch, ArticleRecord, EntityId, FormattedText, NewArticle,
    PublishStatus, UserId,
};
use crate::domain::error::DomainError;
use crate::domain::ports::cache::{node_tag, NODE_LIST_TAG};
use crate::domain::ports::{AccessPolicy, CacheInvalidator, Operation};
use crate::domain::repo::{
    ContentRepository, NewNode, NewParagraph, NodeQuery, StoredNode, ADDRESS_BUNDLE,
    ARTICLE_BUNDLE,
};

/// Resource mapper for articles: turns the create/read/update/delete verbs
/// into operations on the article node and its optional address paragraph.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ContentRepository>,
    access: Arc<dyn AccessPolicy>,
    cache: Arc<dyn CacheInvalidator>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Title given to articles created without one.
    pub default_title: String,
    /// Format tag stamped on every created body.
    pub body_format: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_title: "Untitled".to_string(),
            body_format: "full_html".to_string(),
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        access: Arc<dyn AccessPolicy>,
        cache: Arc<dyn CacheInvalidator>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            access,
            cache,
            config,
        }
    }

    #[instrument(name = "articles.service.get_article", skip(self), fields(article_id = %id))]
    pub async fn get_article(&self, id: EntityId) -> Result<ArticleRecord, DomainError> {
        debug!("Getting article by id");

        let article = self.load_article(id).await?;
        let address = self.resolve_address(&article).await?;
        debug!("Successfully retrieved article");
        Ok(ArticleRecord { article, address })
    }

    /// Published articles, newest first.
    #[instrument(name = "articles.service.list_articles", skip(self))]
    pub async fn list_articles(&self) -> Result<Vec<ArticleRecord>, DomainError> {
        debug!("Listing published articles");

        let ids = self
            .repo
            .query_nodes(&NodeQuery::published_articles())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        let nodes = self
            .repo
            .load_nodes(&ids)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let mut records = Vec::with_capacity(nodes.len());
        for article in nodes.into_iter().filter_map(StoredNode::into_article) {
            let address = self.resolve_address(&article).await?;
            records.push(ArticleRecord { article, address });
        }

        debug!("Successfully listed {} articles", records.len());
        Ok(records)
    }

    /// Create an article, persisting its address first when one is given.
    ///
    /// The two writes are not atomic: if the article save fails the address
    /// stays behind without a referencing article.
    #[instrument(
        name = "articles.service.create_article",
        skip(self, new_article),
        fields(owner = %actor, with_address = new_article.address.is_some())
    )]
    pub async fn create_article(
        &self,
        actor: UserId,
        new_article: NewArticle,
    ) -> Result<ArticleRecord, DomainError> {
        info!("Creating new article");

        self.ensure_access(actor, Operation::Create)?;

        let address = match new_article.address {
            Some(input) => {
                let paragraph = self
                    .repo
                    .create_paragraph(NewParagraph {
                        bundle: ADDRESS_BUNDLE.to_string(),
                        colony: input.colony.unwrap_or_default(),
                        house_number: input.house_number.unwrap_or_default(),
                    })
                    .await
                    .map_err(|e| DomainError::storage(e.to_string()))?;
                debug!(address_id = %paragraph.id, "Address paragraph saved");
                Some(Address::from(paragraph))
            }
            None => None,
        };

        let node = NewNode {
            bundle: ARTICLE_BUNDLE.to_string(),
            title: new_article
                .title
                .unwrap_or_else(|| self.config.default_title.clone()),
            body: FormattedText {
                value: new_article.body.unwrap_or_default(),
                format: self.config.body_format.clone(),
            },
            name: new_article.name.unwrap_or_default(),
            status: PublishStatus::Published,
            owner: actor,
            created_at: Utc::now().trunc_subsecs(0),
            address_ref: address.as_ref().map(|a| a.id),
        };

        let stored = match self.repo.create_node(node).await {
            Ok(stored) => stored,
            Err(e) => {
                if let Some(orphan) = &address {
                    warn!(address_id = %orphan.id, "Article save failed; address left orphaned");
                }
                return Err(DomainError::storage(e.to_string()));
            }
        };
        let article = stored
            .into_article()
            .ok_or_else(|| DomainError::storage("created node is not an article"))?;

        self.cache
            .invalidate_tags(&[node_tag(article.id), NODE_LIST_TAG.to_string()]);

        info!("Successfully created article with id={}", article.id);
        Ok(ArticleRecord { article, address })
    }

    /// Apply `patch` to an existing article. Serves both replace and
    /// partial-update: owner, creation time and address are never touched.
    #[instrument(
        name = "articles.service.update_article",
        skip(self, patch),
        fields(article_id = %id, actor = %actor)
    )]
    pub async fn update_article(
        &self,
        actor: UserId,
        id: EntityId,
        patch: ArticlePatch,
    ) -> Result<Article, DomainError> {
        info!("Updating article");

        let mut current = self.load_article(id).await?;
        self.ensure_access(actor, Operation::Update)?;

        if let Some(title) = non_empty(patch.title) {
            current.title = title;
        }
        if let Some(body) = non_empty(patch.body) {
            current.body.value = body;
        }
        if let Some(name) = non_empty(patch.name) {
            current.name = name;
        }

        self.repo
            .save_node(&StoredNode::from(current.clone()))
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        self.cache
            .invalidate_tags(&[node_tag(current.id), NODE_LIST_TAG.to_string()]);

        info!("Successfully updated article");
        Ok(current)
    }

    /// Delete an article. Its address, if any, is left in storage.
    #[instrument(
        name = "articles.service.delete_article",
        skip(self),
        fields(article_id = %id, actor = %actor)
    )]
    pub async fn delete_article(&self, actor: UserId, id: EntityId) -> Result<(), DomainError> {
        info!("Deleting article");

        let article = self.load_article(id).await?;
        self.ensure_access(actor, Operation::Delete)?;

        self.repo
            .delete_node(article.id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        self.cache
            .invalidate_tags(&[node_tag(article.id), NODE_LIST_TAG.to_string()]);

        if let Some(address_id) = article.address_ref {
            debug!(%address_id, "Address paragraph kept after article delete");
        }
        info!("Successfully deleted article");
        Ok(())
    }

    // --- helpers ---

    /// Load a node and require it to be an article; any other bundle is
    /// reported exactly like a missing id.
    async fn load_article(&self, id: EntityId) -> Result<Article, DomainError> {
        self.repo
            .load_node(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .and_then(StoredNode::into_article)
            .ok_or_else(|| DomainError::article_not_found(id.to_string()))
    }

    async fn resolve_address(&self, article: &Article) -> Result<Option<Address>, DomainError> {
        let Some(address_id) = article.address_ref else {
            return Ok(None);
        };
        let paragraph = self
            .repo
            .load_paragraph(address_id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if paragraph.is_none() {
            debug!(%address_id, "Referenced address no longer exists");
        }
        Ok(paragraph.map(Address::from))
    }

    fn ensure_access(&self, actor: UserId, operation: Operation) -> Result<(), DomainError> {
        if self.access.allows(actor, operation) {
            Ok(())
        } else {
            warn!(user = %actor, %operation, "Access denied");
            Err(DomainError::forbidden(actor.0, operation.as_str()))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
