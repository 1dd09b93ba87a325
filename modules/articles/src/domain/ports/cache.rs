use crate::contract::model::EntityId;

/// Tag shared by every article collection response.
pub const NODE_LIST_TAG: &str = "node_list";

/// Cache tag naming a single node.
pub fn node_tag(id: EntityId) -> String {
    format!("node:{id}")
}

/// Output port: invalidate cached responses carrying any of the given tags.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate_tags(&self, tags: &[String]);
}
