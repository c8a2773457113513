//! Resource loading and management.
//!
//! This crate hands out reference-counted handles to assets by name:
//! - [`ResourceCache`]: weakly tracked, load-on-demand cache
//! - [`Loader`] implementations for shaders and raw asset files
//! - [`ResourceContext`]: the caches bundled for injection

mod cache;
mod context;
mod error;
mod loader;

pub use cache::ResourceCache;
pub use context::{ModelHandle, ResourceContext, ShaderHandle, TextureHandle};
pub use error::{ResourceError, ResourceResult};
pub use loader::{Blob, BlobLoader, Loader, ShaderLoader, ShaderSource};
