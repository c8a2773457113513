//! Loaders that turn a resource name into a loaded value.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ResourceError, ResourceResult};

/// Produces a resource from its name.
///
/// A [`ResourceCache`](crate::ResourceCache) calls this only when no live copy
/// of the named resource exists.
pub trait Loader {
    type Resource;

    fn load(&self, name: &str) -> ResourceResult<Self::Resource>;
}

fn read_text(path: &Path) -> ResourceResult<String> {
    if !path.exists() {
        return Err(ResourceError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Vertex and fragment shader source pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
}

/// Loads `<dir>/<name>.vert` and `<dir>/<name>.frag`.
#[derive(Debug, Clone)]
pub struct ShaderLoader {
    dir: PathBuf,
}

impl ShaderLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Loader for ShaderLoader {
    type Resource = ShaderSource;

    fn load(&self, name: &str) -> ResourceResult<ShaderSource> {
        let vertex = read_text(&self.dir.join(format!("{name}.vert")))?;
        let fragment = read_text(&self.dir.join(format!("{name}.frag")))?;
        if vertex.trim().is_empty() || fragment.trim().is_empty() {
            return Err(ResourceError::InvalidAsset {
                name: name.to_string(),
                message: "shader stage source is empty".to_string(),
            });
        }
        debug!("Loaded shader '{}' from {}", name, self.dir.display());
        Ok(ShaderSource {
            name: name.to_string(),
            vertex,
            fragment,
        })
    }
}

/// Raw file contents for assets whose decoding happens on the GPU side
/// (models, textures).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Loads `<dir>/<name>` as raw bytes.
#[derive(Debug, Clone)]
pub struct BlobLoader {
    dir: PathBuf,
}

impl BlobLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Loader for BlobLoader {
    type Resource = Blob;

    fn load(&self, name: &str) -> ResourceResult<Blob> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Err(ResourceError::FileNotFound(path));
        }
        let bytes = std::fs::read(&path).map_err(|source| ResourceError::Io {
            path: path.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ResourceError::InvalidAsset {
                name: name.to_string(),
                message: "file is empty".to_string(),
            });
        }
        debug!("Loaded '{}' ({} bytes)", path.display(), bytes.len());
        Ok(Blob {
            name: name.to_string(),
            path,
            bytes,
        })
    }
}
