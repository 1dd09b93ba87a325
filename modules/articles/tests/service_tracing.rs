//! Tests to verify that the service layer emits expected tracing spans

mod common;

use tracing_test::traced_test;

use articles::contract::model::{EntityId, NewAddress, NewArticle, UserId};

use common::harness;

#[tokio::test]
#[traced_test]
async fn get_article_emits_span_with_id() {
    let h = harness();
    let _ = h.service.get_article(EntityId(12)).await;

    assert!(logs_contain("articles.service.get_article"));
    assert!(logs_contain("article_id=12"));
}

#[tokio::test]
#[traced_test]
async fn create_article_logs_within_span() {
    let h = harness();
    h.service
        .create_article(
            UserId(5),
            NewArticle {
                address: Some(NewAddress::default()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(logs_contain("articles.service.create_article"));
    assert!(logs_contain("owner=5"));
    assert!(logs_contain("Successfully created article"));
}

#[tokio::test]
#[traced_test]
async fn list_articles_emits_span() {
    let h = harness();
    h.service.list_articles().await.unwrap();
    assert!(logs_contain("articles.service.list_articles"));
}
