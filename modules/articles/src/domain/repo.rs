use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{
    Address, Article, EntityId, FormattedText, PublishStatus, UserId,
};

/// Node bundle served by this module.
pub const ARTICLE_BUNDLE: &str = "article";
/// Paragraph bundle holding an article's address.
pub const ADDRESS_BUNDLE: &str = "address";

/// A content node as the storage engine holds it. The bundle tells which
/// content type the node belongs to; storage may hold bundles other than
/// `article`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNode {
    pub id: EntityId,
    pub bundle: String,
    pub title: String,
    pub body: FormattedText,
    pub name: String,
    pub status: PublishStatus,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub address_ref: Option<EntityId>,
}

impl StoredNode {
    /// View this node as an article, or `None` when it is of another bundle.
    pub fn into_article(self) -> Option<Article> {
        if self.bundle != ARTICLE_BUNDLE {
            return None;
        }
        Some(Article {
            id: self.id,
            title: self.title,
            body: self.body,
            name: self.name,
            status: self.status,
            owner: self.owner,
            created_at: self.created_at,
            address_ref: self.address_ref,
        })
    }
}

impl From<Article> for StoredNode {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            bundle: ARTICLE_BUNDLE.to_string(),
            title: a.title,
            body: a.body,
            name: a.name,
            status: a.status,
            owner: a.owner,
            created_at: a.created_at,
            address_ref: a.address_ref,
        }
    }
}

/// Fully-formed node awaiting an id from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub bundle: String,
    pub title: String,
    pub body: FormattedText,
    pub name: String,
    pub status: PublishStatus,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub address_ref: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredParagraph {
    pub id: EntityId,
    pub bundle: String,
    pub colony: String,
    pub house_number: String,
}

impl From<StoredParagraph> for Address {
    fn from(p: StoredParagraph) -> Self {
        Self {
            id: p.id,
            colony: p.colony,
            house_number: p.house_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParagraph {
    pub bundle: String,
    pub colony: String,
    pub house_number: String,
}

/// Filter for a node query. Results always come newest first, ties broken
/// by id descending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeQuery {
    pub bundle: Option<String>,
    pub status: Option<PublishStatus>,
}

impl NodeQuery {
    /// Published articles, newest first.
    pub fn published_articles() -> Self {
        Self {
            bundle: Some(ARTICLE_BUNDLE.to_string()),
            status: Some(PublishStatus::Published),
        }
    }

    pub fn matches(&self, node: &StoredNode) -> bool {
        self.bundle.as_deref().map_or(true, |b| b == node.bundle)
            && self.status.map_or(true, |s| s == node.status)
    }
}

/// Port for the domain layer: the content storage engine.
/// Each write is atomic on its own; nothing spans two entities.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Load a node of any bundle.
    async fn load_node(&self, id: EntityId) -> anyhow::Result<Option<StoredNode>>;
    /// Ids of the nodes matching `query`, in query order.
    async fn query_nodes(&self, query: &NodeQuery) -> anyhow::Result<Vec<EntityId>>;
    /// Load several nodes, preserving the order of `ids` and skipping missing ones.
    async fn load_nodes(&self, ids: &[EntityId]) -> anyhow::Result<Vec<StoredNode>>;
    /// Persist a new node; storage assigns the id.
    async fn create_node(&self, node: NewNode) -> anyhow::Result<StoredNode>;
    /// Overwrite an existing node (by `node.id`).
    async fn save_node(&self, node: &StoredNode) -> anyhow::Result<()>;
    /// Delete a node. Deleting an absent id is a no-op.
    async fn delete_node(&self, id: EntityId) -> anyhow::Result<()>;
    async fn load_paragraph(&self, id: EntityId) -> anyhow::Result<Option<StoredParagraph>>;
    async fn create_paragraph(&self, paragraph: NewParagraph) -> anyhow::Result<StoredParagraph>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(bundle: &str, status: PublishStatus) -> StoredNode {
        StoredNode {
            id: EntityId(1),
            bundle: bundle.to_string(),
            title: "t".into(),
            body: FormattedText {
                value: "b".into(),
                format: "full_html".into(),
            },
            name: String::new(),
            status,
            owner: UserId(1),
            created_at: Utc::now(),
            address_ref: None,
        }
    }

    #[test]
    fn into_article_rejects_other_bundles() {
        assert!(node("page", PublishStatus::Published).into_article().is_none());
        let article = node(ARTICLE_BUNDLE, PublishStatus::Published)
            .into_article()
            .expect("article bundle");
        assert_eq!(article.id, EntityId(1));
    }

    #[test]
    fn published_articles_query_filters_bundle_and_status() {
        let q = NodeQuery::published_articles();
        assert!(q.matches(&node(ARTICLE_BUNDLE, PublishStatus::Published)));
        assert!(!q.matches(&node(ARTICLE_BUNDLE, PublishStatus::Unpublished)));
        assert!(!q.matches(&node("page", PublishStatus::Published)));
        assert!(NodeQuery::default().matches(&node("page", PublishStatus::Unpublished)));
    }
}
