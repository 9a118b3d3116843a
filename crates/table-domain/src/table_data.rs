// table_data.rs
use crate::{TableRow, TableSchema};
use serde::{Deserialize, Serialize};

/// Esquema de una tabla junto con sus filas. Es la unidad que el
/// adaptador de almacenamiento persiste dentro del documento completo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
  pub schema: TableSchema,
  #[serde(default)]
  pub rows: Vec<TableRow>,
}

impl TableData {
  pub fn new(schema: TableSchema) -> Self {
    Self { schema, rows: Vec::new() }
  }

  pub fn row_by_id(&self, row_id: &str) -> Option<&TableRow> {
    self.rows.iter().find(|r| r.id == row_id)
  }

  pub fn row_by_id_mut(&mut self, row_id: &str) -> Option<&mut TableRow> {
    self.rows.iter_mut().find(|r| r.id == row_id)
  }
}
