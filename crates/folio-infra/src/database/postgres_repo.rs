//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use folio_core::domain::{Category, Post, PostEdit};
use folio_core::error::RepoError;
use folio_core::ports::{CategoryRepository, Counter, GalleryImageRepository, PostRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::gallery_image::Entity as GalleryImageEntity;
use super::entity::post::{self, Entity as PostEntity};
use super::plan::map_db_err;
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL gallery image repository.
pub type PostgresGalleryImageRepository = PostgresBaseRepository<GalleryImageEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn modify(
        &self,
        id: Uuid,
        edit: &PostEdit,
        now: DateTime<Utc>,
    ) -> Result<Post, RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        // Row lock keeps concurrent edits and counter bumps from interleaving.
        let current = PostEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let edited = edit.apply(current.into(), now)?;
        let active_model: post::ActiveModel = edited.into();
        let model = active_model.update(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(post_id = %id, "Post modified");

        Ok(model.into())
    }

    async fn increment(&self, id: Uuid, counter: Counter) -> Result<(), RepoError> {
        let column = match counter {
            Counter::Views => post::Column::Views,
            Counter::Likes => post::Column::Likes,
        };

        let result = PostEntity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn count_by_category(&self, name: &str) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::Category.eq(name))
            .count(self.conn())
            .await
            .map_err(map_db_err)
    }

    async fn rename_category(&self, from: &str, to: &str) -> Result<u64, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Category, Expr::value(to))
            .filter(post::Column::Category.eq(from))
            .exec(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find().all(self.conn()).await.map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl GalleryImageRepository for PostgresGalleryImageRepository {}
