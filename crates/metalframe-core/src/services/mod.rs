//! Application services - use cases built on top of the ports.

mod posts;

pub use posts::{PostInput, PostService};
