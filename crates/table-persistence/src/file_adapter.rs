use crate::document::{decode_document, PersistedDocument, STORAGE_KEY};
use log::{info, warn};
use std::path::{Path, PathBuf};
use table_domain::{DatabaseSchema, DomainError, StorageAdapter, StoreSnapshot, TableData};

/// Variable de entorno con la ruta del documento persistido.
pub const DATA_FILE_ENV: &str = "TABLEFLOW_DATA_FILE";

fn default_data_path() -> PathBuf {
  PathBuf::from(format!("{}.json", STORAGE_KEY))
}

/// Adaptador durable: persiste el documento completo como un archivo
/// JSON en disco (el análogo local del almacenamiento del navegador).
/// Gana el último escritor; se asume una única sesión activa.
pub struct FileStorageAdapter {
  path: PathBuf,
}

impl FileStorageAdapter {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Construye el adaptador leyendo la ruta desde el entorno
  /// (`TABLEFLOW_DATA_FILE`), con `.env` cargado si existe.
  pub fn from_env() -> Self {
    dotenvy::dotenv().ok();
    let path = std::env::var(DATA_FILE_ENV).map(PathBuf::from).unwrap_or_else(|_| default_data_path());
    Self::new(path)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn map_io<T>(res: std::io::Result<T>, op: &str, path: &Path) -> Result<T, DomainError> {
    res.map_err(|e| DomainError::StorageError(format!("{} {}: {}", op, path.display(), e)))
  }
}

impl StorageAdapter for FileStorageAdapter {
  fn load(&self) -> Result<StoreSnapshot, DomainError> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(s) => s,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        info!("documento inexistente en {}, se parte del estado vacío", self.path.display());
        return Ok(StoreSnapshot::empty());
      }
      Err(e) => return Err(DomainError::StorageError(format!("leer {}: {}", self.path.display(), e))),
    };
    let value: serde_json::Value = match serde_json::from_str(&raw) {
      Ok(v) => v,
      Err(e) => {
        warn!("documento corrupto en {} ({}), se parte del estado vacío", self.path.display(), e);
        return Ok(StoreSnapshot::empty());
      }
    };
    match decode_document(value) {
      Some(snapshot) => Ok(snapshot),
      None => {
        warn!("forma de documento no reconocida en {}, se parte del estado vacío", self.path.display());
        Ok(StoreSnapshot::empty())
      }
    }
  }

  fn save_all(&self, table_data: &[TableData], schema: &DatabaseSchema) -> Result<(), DomainError> {
    let doc = PersistedDocument::stamp(table_data.to_vec(), schema.clone());
    let body = serde_json::to_string_pretty(&doc)?;
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        Self::map_io(std::fs::create_dir_all(parent), "crear directorio", parent)?;
      }
    }
    // Escritura en dos pasos: archivo temporal + rename, para no dejar
    // un documento a medias si el proceso cae durante la escritura.
    let tmp = self.path.with_extension("json.tmp");
    Self::map_io(std::fs::write(&tmp, body), "escribir", &tmp)?;
    Self::map_io(std::fs::rename(&tmp, &self.path), "renombrar", &self.path)?;
    Ok(())
  }
}
