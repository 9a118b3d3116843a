// table_schema.rs
use crate::{Column, DomainError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Posición 2-D de una tabla o nodo sobre el lienzo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Esquema de una tabla: identidad, nombre y columnas en orden de
/// inserción (el orden de inserción es el orden de presentación).
///
/// Invariante: los `id` de columna son únicos dentro del esquema. La
/// validación ocurre en `new` y en `add_column`; los documentos
/// importados se re-validan en la capa de importación.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
  pub id: String,
  pub name: String,
  pub columns: Vec<Column>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position: Option<Position>,
}

impl TableSchema {
  pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, DomainError> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(DomainError::ValidationError("El nombre de la tabla no puede estar vacío".to_string()));
    }
    Self::ensure_unique_column_ids(&columns)?;
    Ok(Self { id: Uuid::new_v4().to_string(), name, columns, position: None })
  }

  fn ensure_unique_column_ids(columns: &[Column]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for c in columns {
      if !seen.insert(c.id.as_str()) {
        return Err(DomainError::ValidationError(format!("Id de columna duplicado: {}", c.id)));
      }
    }
    Ok(())
  }

  pub fn with_position(mut self, position: Position) -> Self {
    self.position = Some(position);
    self
  }

  /// Añade una columna manteniendo el invariante de ids únicos.
  pub fn add_column(&mut self, column: Column) -> Result<(), DomainError> {
    if self.columns.iter().any(|c| c.id == column.id) {
      return Err(DomainError::ValidationError(format!("Id de columna duplicado: {}", column.id)));
    }
    self.columns.push(column);
    Ok(())
  }

  pub fn column_by_id(&self, id: &str) -> Option<&Column> {
    self.columns.iter().find(|c| c.id == id)
  }

  pub fn column_by_name(&self, name: &str) -> Option<&Column> {
    self.columns.iter().find(|c| c.name == name)
  }
}

impl fmt::Display for TableSchema {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TableSchema(id: {}, name: {}, columnas: {})", self.id, self.name, self.columns.len())
  }
}
