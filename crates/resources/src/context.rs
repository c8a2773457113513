//! The resource context handed to whatever needs asset access.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::info;

use crate::cache::ResourceCache;
use crate::error::ResourceResult;
use crate::loader::{Blob, BlobLoader, ShaderLoader, ShaderSource};

/// Shared handle to a loaded shader.
pub type ShaderHandle = Rc<ShaderSource>;
/// Shared handle to a loaded model file.
pub type ModelHandle = Rc<Blob>;
/// Shared handle to a loaded texture file.
pub type TextureHandle = Rc<Blob>;

/// Shader, model and texture caches rooted at one asset directory.
///
/// Built once at startup and passed explicitly to the code that creates
/// renderable nodes.
pub struct ResourceContext {
    root: PathBuf,
    pub shaders: ResourceCache<ShaderLoader>,
    pub models: ResourceCache<BlobLoader>,
    pub textures: ResourceCache<BlobLoader>,
}

impl ResourceContext {
    /// Caches reading from `<root>/shaders`, `<root>/models` and `<root>/textures`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        info!("Resource context rooted at {}", root.display());
        Self {
            shaders: ResourceCache::new(ShaderLoader::new(root.join("shaders"))),
            models: ResourceCache::new(BlobLoader::new(root.join("models"))),
            textures: ResourceCache::new(BlobLoader::new(root.join("textures"))),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shader(&mut self, name: &str) -> ResourceResult<ShaderHandle> {
        self.shaders.get(name)
    }

    pub fn model(&mut self, name: &str) -> ResourceResult<ModelHandle> {
        self.models.get(name)
    }

    pub fn texture(&mut self, name: &str) -> ResourceResult<TextureHandle> {
        self.textures.get(name)
    }

    /// Drops expired entries from every cache.
    pub fn clean(&mut self) -> usize {
        self.shaders.clean() + self.models.clean() + self.textures.clean()
    }
}
