use indexmap::IndexMap;
use log::error;
use std::sync::{Arc, Mutex, MutexGuard};
use table_domain::{CellValue, Column, DatabaseSchema, DomainError, Position, Relationship, StorageAdapter,
                   StoreSnapshot, TableData, TableRow, TableSchema};

// Rejilla por defecto para tablas sin posición: 3 columnas con paso
// fijo desde el origen (100, 100).
const GRID_COLUMNS: usize = 3;
const GRID_PITCH_X: f64 = 350.0;
const GRID_PITCH_Y: f64 = 300.0;
const GRID_ORIGIN_X: f64 = 100.0;
const GRID_ORIGIN_Y: f64 = 100.0;

/// Actualización parcial de un esquema de tabla. Los campos ausentes no
/// se tocan.
#[derive(Debug, Clone, Default)]
pub struct TableSchemaPatch {
  pub name: Option<String>,
  pub columns: Option<Vec<Column>>,
  pub position: Option<Position>,
}

/// Autoridad única sobre esquemas de tabla, filas y relaciones.
///
/// Toda mutación sigue el contrato persistir-luego-confirmar: se
/// construye el estado siguiente, se pide al adaptador que lo persista
/// y solo con la confirmación se publica en memoria. Si la persistencia
/// falla, el error se propaga y la memoria queda intacta — nunca un
/// estado en memoria que no pueda recuperarse al recargar.
///
/// El estado (tablas + esquema agregado) vive bajo un único lock para
/// que las dos copias de cada esquema no puedan divergir.
pub struct TableStore<A: StorageAdapter> {
  adapter: Arc<A>,
  state: Mutex<StoreSnapshot>,
}

impl<A: StorageAdapter> TableStore<A> {
  pub fn new(adapter: Arc<A>) -> Self {
    Self { adapter, state: Mutex::new(StoreSnapshot::empty()) }
  }

  fn lock(&self) -> Result<MutexGuard<'_, StoreSnapshot>, DomainError> {
    self.state.lock().map_err(|e| DomainError::StorageError(format!("mutex poisoned: {:?}", e)))
  }

  /// Persiste `next` y, solo si el adaptador confirma, lo publica.
  fn commit(&self, guard: &mut MutexGuard<'_, StoreSnapshot>, next: StoreSnapshot) -> Result<(), DomainError> {
    self.adapter.save_all(&next.table_data, &next.schema)?;
    **guard = next;
    Ok(())
  }

  /// Carga inicial desde el adaptador. Un fallo de carga resetea tablas
  /// y esquema al estado vacío en lugar de dejar al consumidor colgado.
  pub fn load(&self) -> Result<(), DomainError> {
    let snapshot = match self.adapter.load() {
      Ok(s) => s,
      Err(e) => {
        error!("carga inicial fallida ({}), se resetea al estado vacío", e);
        StoreSnapshot::empty()
      }
    };
    let mut state = self.lock()?;
    *state = snapshot;
    Ok(())
  }

  fn default_position(index: usize) -> Position {
    Position::new(GRID_ORIGIN_X + (index % GRID_COLUMNS) as f64 * GRID_PITCH_X,
                  GRID_ORIGIN_Y + (index / GRID_COLUMNS) as f64 * GRID_PITCH_Y)
  }

  /// Crea una tabla. Si el esquema no trae posición se le asigna la
  /// siguiente celda de la rejilla determinista. Devuelve el esquema
  /// tal como quedó registrado.
  pub fn create_table(&self, mut schema: TableSchema) -> Result<TableSchema, DomainError> {
    let mut state = self.lock()?;
    if schema.position.is_none() {
      schema.position = Some(Self::default_position(state.table_data.len()));
    }
    let mut next = state.clone();
    next.table_data.push(TableData::new(schema.clone()));
    next.schema.upsert_table(schema.clone());
    self.commit(&mut state, next)?;
    Ok(schema)
  }

  /// Fusiona una actualización parcial en ambas copias del esquema (la
  /// que vive junto a las filas y la del agregado). Id desconocido es
  /// un no-op silencioso; los cambios de columnas no re-validan filas
  /// existentes.
  pub fn update_table(&self, id: &str, patch: TableSchemaPatch) -> Result<(), DomainError> {
    let mut state = self.lock()?;
    if !state.table_data.iter().any(|t| t.schema.id == id) {
      return Ok(());
    }
    let mut next = state.clone();
    let apply = |schema: &mut TableSchema| {
      if let Some(name) = &patch.name {
        schema.name = name.clone();
      }
      if let Some(columns) = &patch.columns {
        schema.columns = columns.clone();
      }
      if let Some(position) = patch.position {
        schema.position = Some(position);
      }
    };
    if let Some(table) = next.table_data.iter_mut().find(|t| t.schema.id == id) {
      apply(&mut table.schema);
      let updated = table.schema.clone();
      next.schema.upsert_table(updated);
    }
    self.commit(&mut state, next)
  }

  /// Elimina la tabla, sus filas y, de forma atómica con ella, toda
  /// relación que la mencione. Las referencias a nivel de fila en otras
  /// tablas NO se limpian: quedan obsoletas a propósito (comportamiento
  /// observado del sistema que este almacén reproduce).
  pub fn delete_table(&self, id: &str) -> Result<(), DomainError> {
    let mut state = self.lock()?;
    if !state.table_data.iter().any(|t| t.schema.id == id) {
      return Ok(());
    }
    let mut next = state.clone();
    next.table_data.retain(|t| t.schema.id != id);
    next.schema.remove_table(id);
    self.commit(&mut state, next)
  }

  /// Añade una fila con id fresco. No valida columnas obligatorias ni
  /// tipos: esa validación es responsabilidad de quien llama antes de
  /// invocar esta operación. Tabla desconocida: no-op (`None`).
  pub fn add_row(&self, table_id: &str, values: IndexMap<String, CellValue>) -> Result<Option<TableRow>, DomainError> {
    let mut state = self.lock()?;
    if !state.table_data.iter().any(|t| t.schema.id == table_id) {
      return Ok(None);
    }
    let row = TableRow::new(values);
    let mut next = state.clone();
    if let Some(table) = next.table_data.iter_mut().find(|t| t.schema.id == table_id) {
      table.rows.push(row.clone());
    }
    self.commit(&mut state, next)?;
    Ok(Some(row))
  }

  /// Fusiona valores en la fila indicada. No-op si tabla o fila no
  /// existen.
  pub fn update_row(&self,
                    table_id: &str,
                    row_id: &str,
                    values: IndexMap<String, CellValue>)
                    -> Result<(), DomainError> {
    let mut state = self.lock()?;
    let exists = state.table_data
                      .iter()
                      .find(|t| t.schema.id == table_id)
                      .map(|t| t.row_by_id(row_id).is_some())
                      .unwrap_or(false);
    if !exists {
      return Ok(());
    }
    let mut next = state.clone();
    if let Some(table) = next.table_data.iter_mut().find(|t| t.schema.id == table_id) {
      if let Some(row) = table.row_by_id_mut(row_id) {
        for (column_id, value) in values {
          row.set_value(column_id, value);
        }
      }
    }
    self.commit(&mut state, next)
  }

  /// Elimina la fila indicada. No-op si tabla o fila no existen.
  pub fn delete_row(&self, table_id: &str, row_id: &str) -> Result<(), DomainError> {
    let mut state = self.lock()?;
    let exists = state.table_data
                      .iter()
                      .find(|t| t.schema.id == table_id)
                      .map(|t| t.row_by_id(row_id).is_some())
                      .unwrap_or(false);
    if !exists {
      return Ok(());
    }
    let mut next = state.clone();
    if let Some(table) = next.table_data.iter_mut().find(|t| t.schema.id == table_id) {
      table.rows.retain(|r| r.id != row_id);
    }
    self.commit(&mut state, next)
  }

  /// Añade una relación al agregado. Esta capa no verifica que las
  /// parejas tabla/columna existan: la validación llega de arriba (solo
  /// un gesto de conexión legal produce una relación).
  pub fn add_relationship(&self, relationship: Relationship) -> Result<(), DomainError> {
    let mut state = self.lock()?;
    let mut next = state.clone();
    next.schema.add_relationship(relationship);
    self.commit(&mut state, next)
  }

  pub fn delete_relationship(&self, relationship_id: &str) -> Result<(), DomainError> {
    let mut state = self.lock()?;
    if !state.schema.relationships.iter().any(|r| r.id == relationship_id) {
      return Ok(());
    }
    let mut next = state.clone();
    next.schema.remove_relationship(relationship_id);
    self.commit(&mut state, next)
  }

  /// Búsqueda pura, sin efectos.
  pub fn get_table_by_id(&self, id: &str) -> Result<Option<TableData>, DomainError> {
    let state = self.lock()?;
    Ok(state.table_data.iter().find(|t| t.schema.id == id).cloned())
  }

  pub fn list_tables(&self) -> Result<Vec<TableData>, DomainError> {
    Ok(self.lock()?.table_data.clone())
  }

  pub fn schema(&self) -> Result<DatabaseSchema, DomainError> {
    Ok(self.lock()?.schema.clone())
  }

  pub fn table_count(&self) -> Result<usize, DomainError> {
    Ok(self.lock()?.table_data.len())
  }

  /// Reemplazo completo del contenido (importación). Mismo contrato
  /// persistir-luego-confirmar que el resto de mutadores.
  pub fn replace_all(&self, table_data: Vec<TableData>, schema: DatabaseSchema) -> Result<(), DomainError> {
    let mut state = self.lock()?;
    let next = StoreSnapshot { table_data, schema };
    self.commit(&mut state, next)
  }
}
