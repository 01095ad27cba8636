use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{GalleryImage, GalleryImageChanges, NewGalleryImage};
use crate::error::DomainError;
use crate::ports::GalleryImageRepository;
use crate::query::{ImageQuery, Page};

use super::{no_conflict, store_error};

const ENTITY: &str = "GalleryImage";

/// Accessors for gallery images.
pub struct GalleryService {
    images: Arc<dyn GalleryImageRepository>,
}

impl GalleryService {
    pub fn new(images: Arc<dyn GalleryImageRepository>) -> Self {
        Self { images }
    }

    pub async fn list_images(&self, query: &ImageQuery) -> Result<Page<GalleryImage>, DomainError> {
        self.images
            .list(&query.plan())
            .await
            .map_err(|e| e.into_domain(ENTITY, "list"))
    }

    pub async fn get_image(&self, id: Uuid) -> Result<GalleryImage, DomainError> {
        self.images
            .find_by_id(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn create_image(&self, new: NewGalleryImage) -> Result<GalleryImage, DomainError> {
        let image = GalleryImage::create(new.validate()?, Utc::now());
        let image = self
            .images
            .insert(image)
            .await
            .map_err(store_error(ENTITY, "new", no_conflict))?;

        tracing::info!(image_id = %image.id, filename = %image.filename, "Gallery image created");
        Ok(image)
    }

    pub async fn update_image(
        &self,
        id: Uuid,
        changes: GalleryImageChanges,
    ) -> Result<GalleryImage, DomainError> {
        let changes = changes.validate()?;
        let image = self.get_image(id).await?.apply_changes(&changes, Utc::now());
        let image = self
            .images
            .update(image)
            .await
            .map_err(store_error(ENTITY, id, no_conflict))?;

        tracing::info!(image_id = %image.id, "Gallery image updated");
        Ok(image)
    }

    pub async fn delete_image(&self, id: Uuid) -> Result<(), DomainError> {
        self.images
            .delete(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?;

        tracing::info!(image_id = %id, "Gallery image deleted");
        Ok(())
    }
}
