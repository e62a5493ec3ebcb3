//! Domain entities - the core business objects.

mod form;
mod image;
mod lang;
mod localized;
mod post;

pub use form::{PostForm, ValidatedPost};
pub use image::ImageUpload;
pub use lang::{Lang, UnsupportedLang};
pub use localized::LocalizedText;
pub use post::{NewPost, Post, PostChanges, PostId};
