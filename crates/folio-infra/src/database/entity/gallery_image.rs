//! Gallery image entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use folio_core::domain::GalleryImage;
use folio_core::query::Field;

use super::{json_list, string_list};
use crate::database::plan::PlanColumns;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "gallery_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub url: String,
    pub filename: String,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub uploaded_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl PlanColumns for Entity {
    fn column(field: Field) -> Option<Column> {
        match field {
            Field::Id => Some(Column::Id),
            Field::Title => Some(Column::Title),
            Field::Description => Some(Column::Description),
            Field::Filename => Some(Column::Filename),
            Field::Tags => Some(Column::Tags),
            Field::Size => Some(Column::Size),
            Field::CreatedAt => Some(Column::CreatedAt),
            Field::UpdatedAt => Some(Column::UpdatedAt),
            Field::UploadedAt => Some(Column::UploadedAt),
            _ => None,
        }
    }
}

impl From<Model> for GalleryImage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            filename: model.filename,
            title: model.title,
            description: model.description,
            size: model.size,
            width: model.width,
            height: model.height,
            tags: string_list(model.tags),
            uploaded_at: model.uploaded_at.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<GalleryImage> for ActiveModel {
    fn from(image: GalleryImage) -> Self {
        Self {
            id: Set(image.id),
            url: Set(image.url),
            filename: Set(image.filename),
            title: Set(image.title),
            description: Set(image.description),
            size: Set(image.size),
            width: Set(image.width),
            height: Set(image.height),
            tags: Set(json_list(image.tags)),
            uploaded_at: Set(image.uploaded_at.into()),
            created_at: Set(image.created_at.into()),
            updated_at: Set(image.updated_at.into()),
        }
    }
}
