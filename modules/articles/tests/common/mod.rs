#![allow(dead_code)]

use std::sync::Arc;

use chrono::{SubsecRound, Utc};

use articles::contract::model::{EntityId, FormattedText, PublishStatus, UserId};
use articles::domain::ports::AccessPolicy;
use articles::domain::repo::{
    ContentRepository, NewNode, NewParagraph, NodeQuery, StoredNode, StoredParagraph,
};
use articles::domain::service::{Service, ServiceConfig};
use articles::infra::access::AllowAll;
use articles::infra::cache::TagVersionRegistry;
use articles::infra::storage::InMemoryContentRepository;

pub struct Harness {
    pub repo: Arc<InMemoryContentRepository>,
    pub tags: Arc<TagVersionRegistry>,
    pub service: Arc<Service>,
}

pub fn harness() -> Harness {
    harness_with_access(Arc::new(AllowAll))
}

pub fn harness_with_access(access: Arc<dyn AccessPolicy>) -> Harness {
    let repo = Arc::new(InMemoryContentRepository::new());
    let tags = Arc::new(TagVersionRegistry::new());
    let service = Arc::new(Service::new(
        repo.clone(),
        access,
        tags.clone(),
        ServiceConfig::default(),
    ));
    Harness {
        repo,
        tags,
        service,
    }
}

/// A node of an arbitrary bundle, as another content writer would store it.
pub fn foreign_node(bundle: &str, status: PublishStatus) -> NewNode {
    NewNode {
        bundle: bundle.to_string(),
        title: format!("a {bundle}"),
        body: FormattedText {
            value: "body".to_string(),
            format: "basic_html".to_string(),
        },
        name: String::new(),
        status,
        owner: UserId(9),
        created_at: Utc::now().trunc_subsecs(0),
        address_ref: None,
    }
}

/// Repository that stores paragraphs but refuses to create nodes.
pub struct FailingNodeWrites {
    pub inner: Arc<InMemoryContentRepository>,
}

#[async_trait::async_trait]
impl ContentRepository for FailingNodeWrites {
    async fn load_node(&self, id: EntityId) -> anyhow::Result<Option<StoredNode>> {
        self.inner.load_node(id).await
    }

    async fn query_nodes(&self, query: &NodeQuery) -> anyhow::Result<Vec<EntityId>> {
        self.inner.query_nodes(query).await
    }

    async fn load_nodes(&self, ids: &[EntityId]) -> anyhow::Result<Vec<StoredNode>> {
        self.inner.load_nodes(ids).await
    }

    async fn create_node(&self, _node: NewNode) -> anyhow::Result<StoredNode> {
        anyhow::bail!("disk full")
    }

    async fn save_node(&self, node: &StoredNode) -> anyhow::Result<()> {
        self.inner.save_node(node).await
    }

    async fn delete_node(&self, id: EntityId) -> anyhow::Result<()> {
        self.inner.delete_node(id).await
    }

    async fn load_paragraph(&self, id: EntityId) -> anyhow::Result<Option<StoredParagraph>> {
        self.inner.load_paragraph(id).await
    }

    async fn create_paragraph(&self, p: NewParagraph) -> anyhow::Result<StoredParagraph> {
        self.inner.create_paragraph(p).await
    }
}
