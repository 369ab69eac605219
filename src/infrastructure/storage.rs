//! Upload storage: naming, writing and resolving product photos.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::core::error::CoreError;

/// Filesystem store for uploaded images, rooted at the configured
/// uploads directory.
#[derive(Clone, Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the stored name for an uploaded file: a random token joined
    /// to the original name with spaces, colons and backslashes stripped.
    pub fn unique_filename(original: &str) -> String {
        let sanitized: String = original
            .chars()
            .filter(|c| !matches!(c, ' ' | ':' | '\\'))
            .collect();
        format!("{}-{}", Uuid::new_v4(), sanitized)
    }

    /// Resolve a stored filename under the root, rejecting anything that
    /// would escape it.
    pub fn resolve(&self, nombre: &str) -> Result<PathBuf, CoreError> {
        if nombre.is_empty()
            || nombre.contains("..")
            || nombre.contains('/')
            || nombre.contains('\\')
        {
            return Err(CoreError::BadRequest(format!(
                "nombre de archivo invalido: {}",
                nombre
            )));
        }
        Ok(self.root.join(nombre))
    }

    /// Write uploaded bytes under the root, creating it if needed.
    pub async fn save(&self, nombre: &str, contenido: &[u8]) -> Result<(), CoreError> {
        let destino = self.resolve(nombre)?;
        fs::create_dir_all(&self.root).await?;
        fs::write(destino, contenido).await?;
        Ok(())
    }

    /// Read a stored file back, mapping a missing file to `NotFound`.
    pub async fn load(&self, nombre: &str) -> Result<Vec<u8>, CoreError> {
        let ruta = self.resolve(nombre)?;
        match fs::read(&ruta).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(CoreError::NotFound(
                format!("no existe la imagen {}", nombre),
            )),
            Err(err) => Err(err.into()),
        }
    }
}
