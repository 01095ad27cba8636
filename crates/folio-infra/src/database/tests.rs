use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use serde_json::json;
use uuid::Uuid;

use folio_core::domain::{Post, PostEdit, PostStatus};
use folio_core::error::RepoError;
use folio_core::ports::{BaseRepository, Counter, PostRepository};
use folio_core::query::{ListParams, Page, PostQuery};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn post_model(id: Uuid, title: &str, status: post::Status) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: title.to_owned(),
        slug: title.to_lowercase().replace(' ', "-"),
        excerpt: "Excerpt".to_owned(),
        content: "Content".to_owned(),
        featured_image: None,
        images: json!([]),
        author_name: "Site Owner".to_owned(),
        author_avatar: None,
        category: "Rust".to_owned(),
        tags: json!(["async", "tokio"]),
        status,
        published_at: None,
        created_at: now.into(),
        updated_at: now.into(),
        reading_time: 1,
        views: 0,
        likes: 0,
    }
}

fn transaction_log(repo: PostgresPostRepository) -> String {
    let db = Arc::try_unwrap(repo.db).ok().unwrap();
    format!("{:?}", db.into_transaction_log())
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, "Test Post", post::Status::Draft)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.status, PostStatus::Draft);
    assert_eq!(post.tags, vec!["async".to_string(), "tokio".to_string()]);
}

#[tokio::test]
async fn test_list_counts_then_pages() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(12)))])]])
        .append_query_results([vec![
            post_model(Uuid::new_v4(), "Eleven", post::Status::Published),
            post_model(Uuid::new_v4(), "Twelve", post::Status::Published),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let query = PostQuery {
        params: ListParams {
            page: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };

    let page: Page<Post> = repo.list(&query.plan()).await.unwrap();

    assert_eq!(page.total, 12);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 10);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn test_increment_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.increment(Uuid::new_v4(), Counter::Views).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_increment_existing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    repo.increment(Uuid::new_v4(), Counter::Likes).await.unwrap();

    let log = transaction_log(repo);
    assert!(log.contains("UPDATE"));
    assert!(log.contains("likes"));
}

#[tokio::test]
async fn test_modify_archives_inside_transaction() {
    let post_id = Uuid::new_v4();
    let current = post_model(post_id, "Old News", post::Status::Published);
    let archived = post::Model {
        status: post::Status::Archived,
        ..current.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![current]])
        .append_query_results([vec![archived]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo
        .modify(post_id, &PostEdit::Archive, Utc::now())
        .await
        .unwrap();
    assert_eq!(post.status, PostStatus::Archived);

    let log = transaction_log(repo);
    assert!(log.contains("FOR UPDATE"));
    assert!(log.contains("archived"));
}

#[tokio::test]
async fn test_modify_surfaces_rule_violation() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, "Draft", post::Status::Draft)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo
        .modify(post_id, &PostEdit::Restore(PostStatus::Draft), Utc::now())
        .await;

    assert!(matches!(result, Err(RepoError::Rejected(_))));
}

#[tokio::test]
async fn test_modify_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.modify(Uuid::new_v4(), &PostEdit::Archive, Utc::now()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_rename_category_reports_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 3,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.rename_category("Rust", "Rustlang").await.unwrap(), 3);
}
