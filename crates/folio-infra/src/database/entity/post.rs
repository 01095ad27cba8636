//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use folio_core::domain::{Post, PostStatus};
use folio_core::query::Field;

use super::{json_list, string_list};
use crate::database::plan::PlanColumns;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub featured_image: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub category: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub status: Status,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub reading_time: i32,
    pub views: i64,
    pub likes: i64,
}

/// Stored form of [`PostStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
            Status::Archived => PostStatus::Archived,
        }
    }
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Published => Status::Published,
            PostStatus::Archived => Status::Archived,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl PlanColumns for Entity {
    fn column(field: Field) -> Option<Column> {
        match field {
            Field::Id => Some(Column::Id),
            Field::Title => Some(Column::Title),
            Field::Slug => Some(Column::Slug),
            Field::Excerpt => Some(Column::Excerpt),
            Field::Content => Some(Column::Content),
            Field::Category => Some(Column::Category),
            Field::Status => Some(Column::Status),
            Field::Tags => Some(Column::Tags),
            Field::CreatedAt => Some(Column::CreatedAt),
            Field::UpdatedAt => Some(Column::UpdatedAt),
            Field::PublishedAt => Some(Column::PublishedAt),
            Field::Views => Some(Column::Views),
            Field::Likes => Some(Column::Likes),
            _ => None,
        }
    }
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            featured_image: model.featured_image,
            images: string_list(model.images),
            author_name: model.author_name,
            author_avatar: model.author_avatar,
            category: model.category,
            tags: string_list(model.tags),
            status: model.status.into(),
            published_at: model.published_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            reading_time: model.reading_time,
            views: model.views,
            likes: model.likes,
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            slug: Set(post.slug),
            excerpt: Set(post.excerpt),
            content: Set(post.content),
            featured_image: Set(post.featured_image),
            images: Set(json_list(post.images)),
            author_name: Set(post.author_name),
            author_avatar: Set(post.author_avatar),
            category: Set(post.category),
            tags: Set(json_list(post.tags)),
            status: Set(post.status.into()),
            published_at: Set(post.published_at.map(Into::into)),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
            reading_time: Set(post.reading_time),
            views: Set(post.views),
            likes: Set(post.likes),
        }
    }
}
