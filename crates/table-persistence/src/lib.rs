//! Persistencia del conjunto de datos de tablas como un único documento
//! JSON. Este crate expone el documento persistido con sus formas
//! históricas (`document`), el adaptador durable a archivo
//! (`FileStorageAdapter`) y el almacén (`TableStore`) que media toda
//! lectura/escritura a través del contrato `StorageAdapter`.

mod document;
mod file_adapter;
mod store;

pub use document::{decode_document, PersistedDocument, STORAGE_KEY};
pub use file_adapter::{FileStorageAdapter, DATA_FILE_ENV};
pub use store::{TableSchemaPatch, TableStore};

use std::sync::Arc;
use table_domain::DomainError;

/// Construye un almacén sobre el adaptador a archivo configurado por
/// entorno y ejecuta la carga inicial.
pub fn new_from_env() -> Result<TableStore<FileStorageAdapter>, DomainError> {
  let adapter = FileStorageAdapter::from_env();
  let store = TableStore::new(Arc::new(adapter));
  store.load()?;
  Ok(store)
}
