//! SeaORM-backed implementation of the content repository port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built with a
//! `DatabaseConnection` or with a transaction handle.

use std::collections::HashMap;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::contract::model::{EntityId, FormattedText, PublishStatus, UserId};
use crate::domain::repo::{
    ContentRepository, NewNode, NewParagraph, NodeQuery, StoredNode,
    StoredParagraph,
};
use crate::infra::storage::entity::{node, paragraph};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmContentRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmContentRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Primary keys are 32-bit in the schema; ids beyond that range cannot exist.
fn db_key(id: EntityId) -> Option<i32> {
    i32::try_from(id.0).ok()
}

fn node_from_model(m: node::Model) -> anyhow::Result<StoredNode> {
    let created_at = DateTime::<Utc>::from_timestamp(m.created, 0)
        .ok_or_else(|| anyhow!("node {} has invalid created timestamp {}", m.nid, m.created))?;
    Ok(StoredNode {
        id: EntityId(i64::from(m.nid)),
        bundle: m.bundle,
        title: m.title,
        body: FormattedText {
            value: m.body_value,
            format: m.body_format,
        },
        name: m.field_name,
        status: PublishStatus::from(m.status),
        owner: UserId(m.uid),
        created_at,
        address_ref: m.field_address.map(|v| EntityId(i64::from(v))),
    })
}

fn paragraph_from_model(m: paragraph::Model) -> StoredParagraph {
    StoredParagraph {
        id: EntityId(i64::from(m.id)),
        bundle: m.bundle,
        colony: m.field_colony,
        house_number: m.field_house_no,
    }
}

fn address_key(address_ref: Option<EntityId>) -> anyhow::Result<Option<i32>> {
    address_ref
        .map(|id| db_key(id).ok_or_else(|| anyhow!("address id {id} out of range")))
        .transpose()
}

#[async_trait::async_trait]
impl<C> ContentRepository for SeaOrmContentRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn load_node(&self, id: EntityId) -> anyhow::Result<Option<StoredNode>> {
        let Some(key) = db_key(id) else {
            return Ok(None);
        };
        let found = node::Entity::find_by_id(key)
            .one(&self.conn)
            .await
            .context("load_node failed")?;
        found.map(node_from_model).transpose()
    }

    async fn query_nodes(&self, query: &NodeQuery) -> anyhow::Result<Vec<EntityId>> {
        let mut select = node::Entity::find();
        if let Some(bundle) = &query.bundle {
            select = select.filter(node::Column::Bundle.eq(bundle.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(node::Column::Status.eq(status.is_published()));
        }
        select = select
            .order_by_desc(node::Column::Created)
            .order_by_desc(node::Column::Nid);

        let ids: Vec<i32> = select
            .select_only()
            .column(node::Column::Nid)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("query_nodes failed")?;
        Ok(ids.into_iter().map(|v| EntityId(i64::from(v))).collect())
    }

    async fn load_nodes(&self, ids: &[EntityId]) -> anyhow::Result<Vec<StoredNode>> {
        let keys: Vec<i32> = ids.iter().filter_map(|id| db_key(*id)).collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let rows = node::Entity::find()
            .filter(node::Column::Nid.is_in(keys))
            .all(&self.conn)
            .await
            .context("load_nodes failed")?;

        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            let n = node_from_model(row)?;
            by_id.insert(n.id, n);
        }
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn create_node(&self, n: NewNode) -> anyhow::Result<StoredNode> {
        let m = node::ActiveModel {
            nid: NotSet,
            bundle: Set(n.bundle),
            title: Set(n.title),
            body_value: Set(n.body.value),
            body_format: Set(n.body.format),
            field_name: Set(n.name),
            status: Set(n.status.is_published()),
            uid: Set(n.owner.0),
            created: Set(n.created_at.timestamp()),
            field_address: Set(address_key(n.address_ref)?),
        };
        let inserted = m.insert(&self.conn).await.context("create_node failed")?;
        node_from_model(inserted)
    }

    async fn save_node(&self, n: &StoredNode) -> anyhow::Result<()> {
        let key = db_key(n.id).ok_or_else(|| anyhow!("node id {} out of range", n.id))?;
        let m = node::ActiveModel {
            nid: Set(key),
            bundle: Set(n.bundle.clone()),
            title: Set(n.title.clone()),
            body_value: Set(n.body.value.clone()),
            body_format: Set(n.body.format.clone()),
            field_name: Set(n.name.clone()),
            status: Set(n.status.is_published()),
            uid: Set(n.owner.0),
            created: Set(n.created_at.timestamp()),
            field_address: Set(address_key(n.address_ref)?),
        };
        let _ = m.update(&self.conn).await.context("save_node failed")?;
        Ok(())
    }

    async fn delete_node(&self, id: EntityId) -> anyhow::Result<()> {
        let Some(key) = db_key(id) else {
            return Ok(());
        };
        node::Entity::delete_by_id(key)
            .exec(&self.conn)
            .await
            .context("delete_node failed")?;
        Ok(())
    }

    async fn load_paragraph(&self, id: EntityId) -> anyhow::Result<Option<StoredParagraph>> {
        let Some(key) = db_key(id) else {
            return Ok(None);
        };
        let found = paragraph::Entity::find_by_id(key)
            .one(&self.conn)
            .await
            .context("load_paragraph failed")?;
        Ok(found.map(paragraph_from_model))
    }

    async fn create_paragraph(&self, p: NewParagraph) -> anyhow::Result<StoredParagraph> {
        let m = paragraph::ActiveModel {
            id: NotSet,
            bundle: Set(p.bundle),
            field_colony: Set(p.colony),
            field_house_no: Set(p.house_number),
        };
        let inserted = m
            .insert(&self.conn)
            .await
            .context("create_paragraph failed")?;
        Ok(paragraph_from_model(inserted))
    }
}
