//! In-process content store used by `--mock` runs and tests.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::bail;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::contract::model::EntityId;
use crate::domain::repo::{
    ContentRepository, NewNode, NewParagraph, NodeQuery, StoredNode,
    StoredParagraph,
};

#[derive(Default)]
struct State {
    last_node_id: i64,
    last_paragraph_id: i64,
    nodes: BTreeMap<EntityId, StoredNode>,
    paragraphs: BTreeMap<EntityId, StoredParagraph>,
}

/// Nodes and paragraphs kept in ordered maps with independent id sequences.
#[derive(Default)]
pub struct InMemoryContentRepository {
    state: RwLock<State>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node of any bundle directly, bypassing the service.
    pub fn seed_node(&self, node: NewNode) -> StoredNode {
        let mut state = self.state.write();
        state.last_node_id += 1;
        let stored = node_from_new(EntityId(state.last_node_id), node);
        state.nodes.insert(stored.id, stored.clone());
        stored
    }

    /// Remove a paragraph directly, leaving any reference to it dangling.
    pub fn remove_paragraph(&self, id: EntityId) -> bool {
        self.state.write().paragraphs.remove(&id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.state.read().nodes.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.state.read().paragraphs.len()
    }
}

fn node_from_new(id: EntityId, n: NewNode) -> StoredNode {
    StoredNode {
        id,
        bundle: n.bundle,
        title: n.title,
        body: n.body,
        name: n.name,
        status: n.status,
        owner: n.owner,
        created_at: n.created_at,
        address_ref: n.address_ref,
    }
}

/// Newest first; equal timestamps fall back to the higher id.
fn newest_first(a: &StoredNode, b: &StoredNode) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn load_node(&self, id: EntityId) -> anyhow::Result<Option<StoredNode>> {
        Ok(self.state.read().nodes.get(&id).cloned())
    }

    async fn query_nodes(&self, query: &NodeQuery) -> anyhow::Result<Vec<EntityId>> {
        let state = self.state.read();
        let mut matching: Vec<&StoredNode> =
            state.nodes.values().filter(|n| query.matches(n)).collect();
        matching.sort_by(|a, b| newest_first(a, b));
        Ok(matching.into_iter().map(|n| n.id).collect())
    }

    async fn load_nodes(&self, ids: &[EntityId]) -> anyhow::Result<Vec<StoredNode>> {
        let state = self.state.read();
        Ok(ids
            .iter()
            .filter_map(|id| state.nodes.get(id).cloned())
            .collect())
    }

    async fn create_node(&self, node: NewNode) -> anyhow::Result<StoredNode> {
        Ok(self.seed_node(node))
    }

    async fn save_node(&self, node: &StoredNode) -> anyhow::Result<()> {
        let mut state = self.state.write();
        match state.nodes.get_mut(&node.id) {
            Some(slot) => {
                *slot = node.clone();
                Ok(())
            }
            None => bail!("node {} does not exist", node.id),
        }
    }

    async fn delete_node(&self, id: EntityId) -> anyhow::Result<()> {
        self.state.write().nodes.remove(&id);
        Ok(())
    }

    async fn load_paragraph(&self, id: EntityId) -> anyhow::Result<Option<StoredParagraph>> {
        Ok(self.state.read().paragraphs.get(&id).cloned())
    }

    async fn create_paragraph(&self, paragraph: NewParagraph) -> anyhow::Result<StoredParagraph> {
        let mut state = self.state.write();
        state.last_paragraph_id += 1;
        let stored = StoredParagraph {
            id: EntityId(state.last_paragraph_id),
            bundle: paragraph.bundle,
            colony: paragraph.colony,
            house_number: paragraph.house_number,
        };
        state.paragraphs.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
