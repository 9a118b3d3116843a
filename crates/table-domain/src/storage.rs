// storage.rs
use crate::{DatabaseSchema, DomainError, TableData};
use std::sync::{Arc, Mutex};

/// Conjunto completo de datos que el adaptador carga y guarda como una
/// sola unidad: tablas con filas más el esquema agregado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
  pub table_data: Vec<TableData>,
  pub schema: DatabaseSchema,
}

impl StoreSnapshot {
  pub fn empty() -> Self {
    Self::default()
  }
}

/// Contrato de persistencia opaca del conjunto de datos completo.
///
/// El almacén media toda lectura/escritura a través de este trait para
/// que el estado en memoria y el persistido no diverjan en silencio.
/// Cualquier adaptador conforme (archivo local, API remota) puede
/// sustituirse sin cambios en el almacén; la frontera es un punto de
/// extensión deliberado.
pub trait StorageAdapter: Send + Sync {
  /// Carga el documento completo. Formas no reconocidas del documento
  /// deben resolverse al estado vacío, no a un error; los errores se
  /// reservan para fallos reales de E/S.
  fn load(&self) -> Result<StoreSnapshot, DomainError>;

  /// Escribe el documento completo, reemplazando cualquier documento
  /// anterior (sin escrituras parciales; gana el último escritor).
  fn save_all(&self, table_data: &[TableData], schema: &DatabaseSchema) -> Result<(), DomainError>;
}

/// Adaptador en memoria para pruebas y wiring rápido. No es durable.
///
/// `fail_next_save` permite inyectar un fallo de persistencia para
/// ejercitar el contrato de rollback del almacén.
pub struct InMemoryStorageAdapter {
  snapshot: Arc<Mutex<StoreSnapshot>>,
  fail_next_save: Arc<Mutex<bool>>,
}

impl InMemoryStorageAdapter {
  pub fn new() -> Self {
    Self { snapshot: Arc::new(Mutex::new(StoreSnapshot::empty())),
           fail_next_save: Arc::new(Mutex::new(false)) }
  }

  // Helper to map poisoned mutex errors into DomainError
  fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<std::sync::MutexGuard<'a, T>, DomainError> {
    m.lock()
     .map_err(|e| DomainError::StorageError(format!("Mutex '{}' poisoned: {}", name, e)))
  }

  /// Hace fallar la próxima llamada a `save_all` (solo una).
  pub fn fail_next_save(&self) {
    if let Ok(mut flag) = self.lock_map(&self.fail_next_save, "fail_next_save") {
      *flag = true;
    }
  }

  /// Copia del contenido persistido actual (para aserciones en tests).
  pub fn persisted(&self) -> Result<StoreSnapshot, DomainError> {
    Ok(self.lock_map(&self.snapshot, "snapshot")?.clone())
  }
}

impl Default for InMemoryStorageAdapter {
  fn default() -> Self {
    Self::new()
  }
}

impl StorageAdapter for InMemoryStorageAdapter {
  fn load(&self) -> Result<StoreSnapshot, DomainError> {
    Ok(self.lock_map(&self.snapshot, "snapshot")?.clone())
  }

  fn save_all(&self, table_data: &[TableData], schema: &DatabaseSchema) -> Result<(), DomainError> {
    {
      let mut flag = self.lock_map(&self.fail_next_save, "fail_next_save")?;
      if *flag {
        *flag = false;
        return Err(DomainError::StorageError("fallo de guardado inyectado".to_string()));
      }
    }
    let mut snap = self.lock_map(&self.snapshot, "snapshot")?;
    snap.table_data = table_data.to_vec();
    snap.schema = schema.clone();
    Ok(())
  }
}
