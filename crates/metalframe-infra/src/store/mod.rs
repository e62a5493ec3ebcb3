//! Local store implementations - the client-side fallback slots.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;
