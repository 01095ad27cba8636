//! PostgreSQL persistence via SeaORM.

mod connections;
pub mod entity;
mod plan;
mod postgres_base;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use plan::PlanColumns;
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresGalleryImageRepository, PostgresPostRepository,
};

#[cfg(test)]
mod tests;
