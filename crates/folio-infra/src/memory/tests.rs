use std::sync::Arc;

use uuid::Uuid;

use folio_core::DomainError;
use folio_core::domain::{
    AuthorProfile, CategoryChanges, GalleryImageChanges, NewCategory, NewGalleryImage, NewPost,
    PostChanges, PostStatus,
};
use folio_core::query::{CategoryQuery, ImageQuery, ListParams, PostQuery};
use folio_core::service::{CategoryService, GalleryService, PostService};

use super::*;

struct Fixture {
    posts: PostService,
    categories: CategoryService,
    gallery: GalleryService,
    post_repo: Arc<InMemoryPostRepository>,
}

async fn fixture() -> Fixture {
    let post_repo = Arc::new(InMemoryPostRepository::new());
    let category_repo = Arc::new(InMemoryCategoryRepository::new());
    let fixture = Fixture {
        posts: PostService::new(
            post_repo.clone(),
            category_repo.clone(),
            AuthorProfile::default(),
        ),
        categories: CategoryService::new(category_repo, post_repo.clone()),
        gallery: GalleryService::new(Arc::new(InMemoryGalleryImageRepository::new())),
        post_repo,
    };
    for name in ["Rust", "Travel"] {
        fixture
            .categories
            .create_category(NewCategory {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    fixture
}

fn new_post(title: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        excerpt: format!("About {title}"),
        content: "<p>Some words about things</p>".to_string(),
        category: "Rust".to_string(),
        tags: vec!["notes".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_hello_world_lifecycle() {
    let f = fixture().await;

    let post = f
        .posts
        .create_post(NewPost {
            status: Some(PostStatus::Draft),
            ..new_post("Hello World")
        })
        .await
        .unwrap();
    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.status, PostStatus::Draft);
    assert!(post.published_at.is_none());
    assert!(post.reading_time >= 1);
    assert_eq!((post.views, post.likes), (0, 0));
    assert_eq!(post.author_name, "Site Owner");

    let published = f
        .posts
        .update_post(
            post.id,
            PostChanges {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let published_at = published.published_at.expect("set on first publish");

    let archived = f.posts.archive_post(post.id).await.unwrap();
    assert_eq!(archived.status, PostStatus::Archived);
    assert_eq!(archived.published_at, Some(published_at));
    assert_eq!(archived.title, published.title);

    let restored = f
        .posts
        .restore_post(post.id, PostStatus::Draft)
        .await
        .unwrap();
    assert_eq!(restored.status, PostStatus::Draft);
    assert!(restored.published_at.is_none());
}

#[tokio::test]
async fn test_republishing_keeps_first_publish_time() {
    let f = fixture().await;
    let post = f
        .posts
        .create_post(NewPost {
            status: Some(PostStatus::Published),
            ..new_post("First")
        })
        .await
        .unwrap();
    let first = post.published_at.unwrap();

    let draft = f
        .posts
        .update_post(
            post.id,
            PostChanges {
                status: Some(PostStatus::Draft),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(draft.published_at, Some(first));

    let again = f
        .posts
        .update_post(
            post.id,
            PostChanges {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(again.published_at, Some(first));
}

#[tokio::test]
async fn test_duplicate_slug_conflicts_and_leaves_store_unchanged() {
    let f = fixture().await;
    f.posts.create_post(new_post("Same Title")).await.unwrap();

    let err = f.posts.create_post(new_post("Same Title")).await.unwrap_err();

    assert!(matches!(err, DomainError::Conflict(ref msg) if msg.contains("same-title")));
    assert_eq!(f.post_repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_to_taken_slug_conflicts() {
    let f = fixture().await;
    f.posts.create_post(new_post("Taken")).await.unwrap();
    let other = f.posts.create_post(new_post("Other")).await.unwrap();

    let err = f
        .posts
        .update_post(
            other.id,
            PostChanges {
                slug: Some("taken".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(f.posts.get_post(other.id).await.unwrap().slug, "other");
}

#[tokio::test]
async fn test_update_omitting_fields_keeps_them() {
    let f = fixture().await;
    let post = f
        .posts
        .create_post(NewPost {
            featured_image: Some("/uploads/cover.jpg".to_string()),
            ..new_post("Keep Me")
        })
        .await
        .unwrap();

    let updated = f
        .posts
        .update_post(
            post.id,
            PostChanges {
                title: Some("Keep Me Too".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Keep Me Too");
    assert_eq!(updated.slug, post.slug);
    assert_eq!(updated.excerpt, post.excerpt);
    assert_eq!(updated.content, post.content);
    assert_eq!(updated.featured_image, post.featured_image);
    assert_eq!(updated.tags, post.tags);
    assert_eq!(updated.category, post.category);
    assert!(updated.updated_at >= post.updated_at);
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let f = fixture().await;

    let err = f
        .posts
        .update_post(Uuid::new_v4(), PostChanges::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity_type: "Post", .. }));
}

#[tokio::test]
async fn test_invalid_payload_never_reaches_store() {
    let f = fixture().await;

    let err = f
        .posts
        .create_post(NewPost {
            title: "   ".to_string(),
            ..new_post("ignored")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "title", .. }));

    let err = f
        .posts
        .create_post(NewPost {
            category: "Unknown".to_string(),
            ..new_post("Orphan")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "category", .. }));

    assert!(f.post_repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_archived_post_needs_explicit_restore() {
    let f = fixture().await;
    let post = f.posts.create_post(new_post("Shelved")).await.unwrap();
    f.posts.archive_post(post.id).await.unwrap();

    let err = f
        .posts
        .update_post(
            post.id,
            PostChanges {
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "status", .. }));

    let restored = f
        .posts
        .restore_post(post.id, PostStatus::Published)
        .await
        .unwrap();
    assert_eq!(restored.status, PostStatus::Published);
    assert!(restored.published_at.is_some());
}

#[tokio::test]
async fn test_counters_increment_and_missing_post_fails() {
    let f = fixture().await;
    let post = f.posts.create_post(new_post("Counted")).await.unwrap();

    f.posts.increment_views(post.id).await.unwrap();
    f.posts.increment_views(post.id).await.unwrap();
    f.posts.increment_likes(post.id).await.unwrap();

    let stored = f.posts.get_post(post.id).await.unwrap();
    assert_eq!((stored.views, stored.likes), (2, 1));
    assert_eq!(stored.updated_at, post.updated_at);

    assert!(matches!(
        f.posts.increment_likes(Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let f = fixture().await;
    let post = f.posts.create_post(new_post("Popular")).await.unwrap();
    let id = post.id;
    let posts = Arc::new(f.posts);

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let posts = posts.clone();
            tokio::spawn(async move { posts.increment_views(id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(posts.get_post(id).await.unwrap().views, 50);
}

#[tokio::test]
async fn test_pagination_over_fifteen_posts() {
    let f = fixture().await;
    for i in 0..15 {
        f.posts.create_post(new_post(&format!("Post {i:02}"))).await.unwrap();
    }
    let page = |page| PostQuery {
        params: ListParams {
            page: Some(page),
            limit: Some(10),
            ..Default::default()
        },
        ..Default::default()
    };

    let second = f.posts.list_posts(&page(2)).await.unwrap();
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.total, 15);
    assert_eq!(second.total_pages, 2);

    let third = f.posts.list_posts(&page(3)).await.unwrap();
    assert!(third.items.is_empty());

    let far = f.posts.list_posts(&page(u64::MAX)).await.unwrap();
    assert!(far.items.is_empty());
    assert_eq!(far.total, 15);
    assert_eq!(far.page, u64::MAX);
}

#[tokio::test]
async fn test_sort_by_title_ascending() {
    let f = fixture().await;
    for title in ["Pear", "apple", "Banana", "Cherry"] {
        f.posts.create_post(new_post(title)).await.unwrap();
    }

    let page = f
        .posts
        .list_posts(&PostQuery {
            params: ListParams {
                sort_by: Some("title".to_string()),
                sort_order: Some("asc".to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await
        .unwrap();

    let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["apple", "Banana", "Cherry", "Pear"]);
}

#[tokio::test]
async fn test_public_listing_only_shows_published() {
    let f = fixture().await;
    f.posts.create_post(new_post("Hidden")).await.unwrap();
    let live = f
        .posts
        .create_post(NewPost {
            status: Some(PostStatus::Published),
            ..new_post("Live")
        })
        .await
        .unwrap();

    let page = f
        .posts
        .list_published_posts(PostQuery {
            status: Some(PostStatus::Draft),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, live.id);

    assert!(f.posts.get_published_post("live").await.is_ok());
    assert!(matches!(
        f.posts.get_published_post("hidden").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_related_posts_share_category_and_exclude_self() {
    let f = fixture().await;
    let published = |title: &str, category: &str| NewPost {
        status: Some(PostStatus::Published),
        category: category.to_string(),
        ..new_post(title)
    };
    let a = published("A", "Rust");
    let b = published("B", "Rust");
    let c = published("C", "Travel");
    for new in [a, b, c] {
        f.posts.create_post(new).await.unwrap();
    }

    let related = f.posts.related_posts("a", 3).await.unwrap();

    assert_eq!(related.len(), 1);
    assert_eq!(related[0].slug, "b");
}

#[tokio::test]
async fn test_post_stats() {
    let f = fixture().await;
    let post = f
        .posts
        .create_post(NewPost {
            status: Some(PostStatus::Published),
            ..new_post("Read Me")
        })
        .await
        .unwrap();
    f.posts.create_post(new_post("Draft One")).await.unwrap();
    f.posts.increment_views(post.id).await.unwrap();

    let stats = f.posts.post_stats().await.unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.published, 1);
    assert_eq!(stats.drafts, 1);
    assert_eq!(stats.total_views, 1);
    assert_eq!(stats.top_posts[0].id, post.id);
}

#[tokio::test]
async fn test_category_delete_guard() {
    let f = fixture().await;
    let rust = f.categories.list_categories(&CategoryQuery::default()).await.unwrap();
    let rust = rust.items.into_iter().find(|c| c.name == "Rust").unwrap();
    let post = f.posts.create_post(new_post("Pinned")).await.unwrap();

    let err = f.categories.delete_category(rust.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Referential(ref msg) if msg.contains("1 post")));
    assert!(f.categories.get_category(rust.id).await.is_ok());

    f.posts.delete_post(post.id).await.unwrap();
    f.categories.delete_category(rust.id).await.unwrap();
    assert!(matches!(
        f.categories.get_category(rust.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_category_rename_follows_posts() {
    let f = fixture().await;
    let page = f
        .categories
        .list_categories(&CategoryQuery {
            search: Some("rust".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let rust = page.items.into_iter().next().unwrap();
    let post = f.posts.create_post(new_post("Moved")).await.unwrap();

    let renamed = f
        .categories
        .update_category(
            rust.id,
            CategoryChanges {
                name: Some("Rustlang".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(renamed.slug, rust.slug);
    assert_eq!(f.posts.get_post(post.id).await.unwrap().category, "Rustlang");
}

#[tokio::test]
async fn test_duplicate_category_name_conflicts() {
    let f = fixture().await;

    let err = f
        .categories
        .create_category(NewCategory {
            name: "Rust".to_string(),
            slug: Some("rust-again".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_renaming_category_to_taken_name_conflicts() {
    let f = fixture().await;
    let travel = f
        .categories
        .list_categories(&CategoryQuery {
            search: Some("travel".to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .items
        .remove(0);
    let post = f
        .posts
        .create_post(NewPost {
            category: "Travel".to_string(),
            ..new_post("Trip notes")
        })
        .await
        .unwrap();

    let err = f
        .categories
        .update_category(
            travel.id,
            CategoryChanges {
                name: Some("Rust".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(f.categories.get_category(travel.id).await.unwrap().name, "Travel");
    assert_eq!(f.posts.get_post(post.id).await.unwrap().category, "Travel");
}

#[tokio::test]
async fn test_categories_default_to_name_order() {
    let f = fixture().await;
    f.categories
        .create_category(NewCategory {
            name: "Art".to_string(),
            color: Some("#FF0000".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let page = f.categories.list_categories(&CategoryQuery::default()).await.unwrap();

    let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Art", "Rust", "Travel"]);
    assert_eq!(page.items[0].color, "#ff0000");
}

#[tokio::test]
async fn test_gallery_crud_and_tag_filter() {
    let f = fixture().await;
    let image = f
        .gallery
        .create_image(NewGalleryImage {
            url: "https://cdn.example.com/sunset.jpg".to_string(),
            filename: "sunset.jpg".to_string(),
            size: 2048,
            tags: vec!["travel".to_string(), "sky".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
    f.gallery
        .create_image(NewGalleryImage {
            url: "/uploads/desk.png".to_string(),
            filename: "desk.png".to_string(),
            size: 1024,
            tags: vec!["skyline-adjacent".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    let tagged = f
        .gallery
        .list_images(&ImageQuery {
            tag: Some("sky".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(tagged.total, 1);
    assert_eq!(tagged.items[0].id, image.id);

    let updated = f
        .gallery
        .update_image(
            image.id,
            GalleryImageChanges {
                title: Some(Some("Sunset".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title.as_deref(), Some("Sunset"));
    assert_eq!(updated.filename, "sunset.jpg");

    f.gallery.delete_image(image.id).await.unwrap();
    assert!(matches!(
        f.gallery.delete_image(image.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_gallery_rejects_bad_url() {
    let f = fixture().await;

    let err = f
        .gallery
        .create_image(NewGalleryImage {
            url: "ftp://example.com/x.jpg".to_string(),
            filename: "x.jpg".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation { field: "url", .. }));
}
