//! Media store implementations - Cloudinary and local disk.

mod local_disk;

#[cfg(feature = "cloudinary")]
mod cloudinary;

pub use local_disk::{LocalDiskMediaStore, UPLOADS_URL_PREFIX};

#[cfg(feature = "cloudinary")]
pub use cloudinary::{CloudinaryConfig, CloudinaryMediaStore, public_id_from_url};
