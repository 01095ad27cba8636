//! SeaORM entities, one per table.

pub mod category;
pub mod gallery_image;
pub mod post;

use sea_orm::entity::prelude::Json;

/// Decode a JSONB string array. Rows are only ever written by this crate,
/// so anything that isn't an array of strings reads back as empty.
pub(crate) fn string_list(value: Json) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

pub(crate) fn json_list(values: Vec<String>) -> Json {
    Json::from(values)
}
