//! Dashboard aggregates over the post collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Post, PostStatus};
use crate::query::{ListParams, PostQuery};

const TOP_POSTS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub total: u64,
    pub drafts: u64,
    pub published: u64,
    pub archived: u64,
    pub total_views: i64,
    pub total_likes: i64,
    /// Most used categories first.
    pub by_category: Vec<CategoryCount>,
    /// Most viewed posts first.
    pub top_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub posts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
    pub views: i64,
    pub likes: i64,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            status: post.status,
            views: post.views,
            likes: post.likes,
        }
    }
}

impl PostStats {
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let count = |status: PostStatus| posts.iter().filter(|p| p.status == status).count() as u64;

        let mut per_category: BTreeMap<&str, u64> = BTreeMap::new();
        for post in &posts {
            *per_category.entry(post.category.as_str()).or_default() += 1;
        }
        let mut by_category: Vec<CategoryCount> = per_category
            .into_iter()
            .map(|(category, posts)| CategoryCount {
                category: category.to_string(),
                posts,
            })
            .collect();
        // BTreeMap order makes this stable on ties.
        by_category.sort_by(|a, b| b.posts.cmp(&a.posts));

        let top = PostQuery {
            params: ListParams {
                sort_by: Some("views".to_string()),
                sort_order: Some("desc".to_string()),
                page: Some(1),
                limit: Some(TOP_POSTS),
            },
            ..Default::default()
        }
        .plan()
        .apply(posts.iter().cloned());

        Self {
            total: posts.len() as u64,
            drafts: count(PostStatus::Draft),
            published: count(PostStatus::Published),
            archived: count(PostStatus::Archived),
            total_views: posts.iter().map(|p| p.views).sum(),
            total_likes: posts.iter().map(|p| p.likes).sum(),
            by_category,
            top_posts: top.items.iter().map(PostSummary::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthorProfile, NewPost};
    use chrono::Utc;

    fn post(title: &str, category: &str, status: PostStatus, views: i64) -> Post {
        let new = NewPost {
            title: title.to_string(),
            excerpt: "excerpt".to_string(),
            content: "content".to_string(),
            category: category.to_string(),
            tags: vec!["tag".to_string()],
            ..Default::default()
        }
        .validate()
        .unwrap();
        let mut post = Post::create(new, &AuthorProfile::default(), Utc::now());
        post.status = status;
        post.views = views;
        post.likes = views / 2;
        post
    }

    #[test]
    fn test_stats_aggregate_counts() {
        let posts = vec![
            post("A", "Essays", PostStatus::Published, 10),
            post("B", "Essays", PostStatus::Draft, 0),
            post("C", "News", PostStatus::Archived, 4),
        ];
        let stats = PostStats::from_posts(posts);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.drafts, 1);
        assert_eq!(stats.archived, 1);
        assert_eq!(stats.total_views, 14);
        assert_eq!(stats.total_likes, 7);
        assert_eq!(
            stats.by_category,
            vec![
                CategoryCount {
                    category: "Essays".to_string(),
                    posts: 2
                },
                CategoryCount {
                    category: "News".to_string(),
                    posts: 1
                },
            ]
        );
        assert_eq!(stats.top_posts[0].title, "A");
        assert_eq!(stats.top_posts[1].title, "C");
    }

    #[test]
    fn test_stats_on_empty_collection() {
        let stats = PostStats::from_posts(Vec::new());
        assert_eq!(stats.total, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.top_posts.is_empty());
    }
}
