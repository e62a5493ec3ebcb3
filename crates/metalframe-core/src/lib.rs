//! # MetalFrame Core
//!
//! The domain layer of the MetalFrame Studio site: posts, their localized
//! copy, the ports infrastructure must implement, the server-side post
//! service and the client-side synchronization layer.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod sync;

pub use error::{DomainError, SyncError};
