mod common;

use std::sync::Arc;

use articles::contract::model::{
    ArticlePatch, EntityId, NewAddress, NewArticle, PublishStatus, UserId,
};
use articles::domain::error::DomainError;
use articles::domain::service::{Service, ServiceConfig};
use articles::infra::access::{AllowAll, DenyAnonymousWrites};
use articles::infra::cache::TagVersionRegistry;
use articles::infra::storage::InMemoryContentRepository;

use common::{foreign_node, harness, harness_with_access, FailingNodeWrites};

fn hello() -> NewArticle {
    NewArticle {
        title: Some("Hello".into()),
        body: Some("World".into()),
        name: Some("N".into()),
        address: Some(NewAddress {
            colony: Some("C1".into()),
            house_number: Some("12".into()),
        }),
    }
}

#[tokio::test]
async fn create_applies_defaults_and_owner() {
    let h = harness();
    let record = h
        .service
        .create_article(UserId(7), NewArticle::default())
        .await
        .unwrap();

    let a = &record.article;
    assert_eq!(a.title, "Untitled");
    assert_eq!(a.body.value, "");
    assert_eq!(a.body.format, "full_html");
    assert_eq!(a.name, "");
    assert_eq!(a.status, PublishStatus::Published);
    assert_eq!(a.owner, UserId(7));
    assert!(a.address_ref.is_none());
    assert!(record.address.is_none());
    assert_eq!(h.repo.paragraph_count(), 0);
}

#[tokio::test]
async fn create_keeps_explicit_empty_title() {
    let h = harness();
    let record = h
        .service
        .create_article(
            UserId(1),
            NewArticle {
                title: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(record.article.title, "");
}

#[tokio::test]
async fn create_with_address_links_new_paragraph() {
    let h = harness();
    let record = h.service.create_article(UserId(1), hello()).await.unwrap();

    let address = record.address.expect("address");
    assert_eq!(address.colony, "C1");
    assert_eq!(address.house_number, "12");
    assert_eq!(record.article.address_ref, Some(address.id));
    assert_eq!(h.repo.paragraph_count(), 1);
}

#[tokio::test]
async fn empty_address_object_creates_empty_paragraph() {
    let h = harness();
    let record = h
        .service
        .create_article(
            UserId(1),
            NewArticle {
                address: Some(NewAddress::default()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let address = record.address.expect("address");
    assert_eq!(address.colony, "");
    assert_eq!(address.house_number, "");
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let h = harness();
    let created = h.service.create_article(UserId(1), hello()).await.unwrap();
    let fetched = h.service.get_article(created.article.id).await.unwrap();
    assert_eq!(created, fetched);
}

#[tokio::test]
async fn missing_address_paragraph_is_omitted() {
    let h = harness();
    let created = h.service.create_article(UserId(1), hello()).await.unwrap();
    let address_id = created.address.unwrap().id;
    assert!(h.repo.remove_paragraph(address_id));

    let fetched = h.service.get_article(created.article.id).await.unwrap();
    assert!(fetched.address.is_none());
    assert_eq!(fetched.article.address_ref, Some(address_id));
}

#[tokio::test]
async fn other_bundles_are_not_found_for_every_verb() {
    let h = harness();
    let page = h.repo.seed_node(foreign_node("page", PublishStatus::Published));

    let get = h.service.get_article(page.id).await.unwrap_err();
    let update = h
        .service
        .update_article(UserId(1), page.id, ArticlePatch::default())
        .await
        .unwrap_err();
    let delete = h.service.delete_article(UserId(1), page.id).await.unwrap_err();

    for err in [get, update, delete] {
        match err {
            DomainError::ArticleNotFound { id } => assert_eq!(id, page.id.to_string()),
            other => panic!("expected not found, got {other:?}"),
        }
    }
    assert_eq!(h.repo.node_count(), 1);
    assert!(h.service.list_articles().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let h = harness();
    let err = h.service.get_article(EntityId(404)).await.unwrap_err();
    assert_eq!(err.to_string(), "Article with ID 404 not found.");
}

#[tokio::test]
async fn list_is_published_articles_newest_first() {
    let h = harness();
    let first = h.service.create_article(UserId(1), hello()).await.unwrap();
    let second = h
        .service
        .create_article(UserId(1), NewArticle::default())
        .await
        .unwrap();
    h.repo
        .seed_node(foreign_node("article", PublishStatus::Unpublished));
    h.repo.seed_node(foreign_node("page", PublishStatus::Published));

    let ids = |records: Vec<articles::contract::model::ArticleRecord>| -> Vec<EntityId> {
        records.into_iter().map(|r| r.article.id).collect()
    };
    let listed = ids(h.service.list_articles().await.unwrap());
    assert_eq!(listed, vec![second.article.id, first.article.id]);

    // No intervening writes, same order.
    assert_eq!(ids(h.service.list_articles().await.unwrap()), listed);
}

#[tokio::test]
async fn unpublished_article_is_still_retrievable_by_id() {
    let h = harness();
    let draft = h
        .repo
        .seed_node(foreign_node("article", PublishStatus::Unpublished));
    let record = h.service.get_article(draft.id).await.unwrap();
    assert_eq!(record.article.status, PublishStatus::Unpublished);
}

#[tokio::test]
async fn update_ignores_empty_and_absent_fields() {
    let h = harness();
    let created = h.service.create_article(UserId(1), hello()).await.unwrap();
    let id = created.article.id;

    let updated = h
        .service
        .update_article(
            UserId(2),
            id,
            ArticlePatch {
                title: Some(String::new()),
                body: None,
                name: Some("0".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Hello");
    assert_eq!(updated.body.value, "World");
    assert_eq!(updated.name, "0");
    assert_eq!(updated.owner, UserId(1));
    assert_eq!(updated.created_at, created.article.created_at);
    assert_eq!(updated.address_ref, created.article.address_ref);

    let fetched = h.service.get_article(id).await.unwrap();
    assert_eq!(fetched.article, updated);
}

#[tokio::test]
async fn delete_keeps_address_paragraph() {
    let h = harness();
    let created = h.service.create_article(UserId(1), hello()).await.unwrap();
    let id = created.article.id;

    h.service.delete_article(UserId(1), id).await.unwrap();

    assert!(matches!(
        h.service.get_article(id).await,
        Err(DomainError::ArticleNotFound { .. })
    ));
    assert_eq!(h.repo.paragraph_count(), 1);
    assert_eq!(h.repo.node_count(), 0);
}

#[tokio::test]
async fn writes_invalidate_item_and_list_tags() {
    let h = harness();
    let created = h.service.create_article(UserId(1), hello()).await.unwrap();
    let tag = format!("node:{}", created.article.id);
    assert_eq!(h.tags.version(&tag), 1);
    assert_eq!(h.tags.version("node_list"), 1);

    h.service
        .update_article(
            UserId(1),
            created.article.id,
            ArticlePatch {
                title: Some("t".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    h.service
        .delete_article(UserId(1), created.article.id)
        .await
        .unwrap();

    assert_eq!(h.tags.version(&tag), 3);
    assert_eq!(h.tags.version("node_list"), 3);
}

#[tokio::test]
async fn failed_lookup_invalidates_nothing() {
    let h = harness();
    let _ = h.service.delete_article(UserId(1), EntityId(1)).await;
    assert_eq!(h.tags.version("node_list"), 0);
}

#[tokio::test]
async fn failed_article_save_leaves_orphaned_address() {
    let inner = Arc::new(InMemoryContentRepository::new());
    let service = Service::new(
        Arc::new(FailingNodeWrites {
            inner: inner.clone(),
        }),
        Arc::new(AllowAll),
        Arc::new(TagVersionRegistry::new()),
        ServiceConfig::default(),
    );

    let err = service.create_article(UserId(1), hello()).await.unwrap_err();
    assert!(matches!(err, DomainError::Storage { .. }));
    assert_eq!(inner.paragraph_count(), 1);
    assert_eq!(inner.node_count(), 0);
}

#[tokio::test]
async fn anonymous_writes_can_be_denied() {
    let h = harness_with_access(Arc::new(DenyAnonymousWrites::default()));

    let err = h
        .service
        .create_article(UserId::ANONYMOUS, hello())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
    // The check runs before any write.
    assert_eq!(h.repo.paragraph_count(), 0);

    let created = h.service.create_article(UserId(5), hello()).await.unwrap();
    let err = h
        .service
        .delete_article(UserId::ANONYMOUS, created.article.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
    assert_eq!(h.repo.node_count(), 1);
}

#[tokio::test]
async fn missing_article_wins_over_access_denial() {
    let h = harness_with_access(Arc::new(DenyAnonymousWrites::default()));
    let err = h
        .service
        .update_article(UserId::ANONYMOUS, EntityId(77), ArticlePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ArticleNotFound { .. }));
}
