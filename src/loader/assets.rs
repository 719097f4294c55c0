use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::error::MapError;

/// Where tileset images and map documents come from.
pub trait AssetSource {
    /// Raw bytes of the named resource.
    fn read(&self, name: &str) -> Result<Vec<u8>, MapError>;
}

/// Resources as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    /// Reads names relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirAssets { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    fn read(&self, name: &str) -> Result<Vec<u8>, MapError> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|source| MapError::ResourceNotFound {
            name: name.to_owned(),
            path: Some(path),
            source,
        })
    }
}

/// Resources held in memory, mostly for tests and generated content.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a resource.
    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(name.to_owned(), bytes.into());
        self
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, name: &str) -> Result<Vec<u8>, MapError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::ResourceNotFound {
                name: name.to_owned(),
                path: None,
                source: io::Error::new(io::ErrorKind::NotFound, "no such in-memory asset"),
            })
    }
}

impl<S: AssetSource + ?Sized> AssetSource for &S {
    fn read(&self, name: &str) -> Result<Vec<u8>, MapError> {
        (**self).read(name)
    }
}
