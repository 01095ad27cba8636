//! Domain entities - the core business objects.

mod category;
mod gallery_image;
mod post;

pub use category::{Category, CategoryChanges, NewCategory};
pub use gallery_image::{GalleryImage, GalleryImageChanges, NewGalleryImage};
pub use post::{AuthorProfile, NewPost, Post, PostChanges, PostEdit, PostStatus};
