// table_row.rs
use crate::{CellValue, DomainError, TableSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fila de una tabla: identidad más un mapeo abierto de id de columna a
/// valor. El mapa conserva orden de inserción.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
  pub id: String,
  #[serde(flatten)]
  pub values: IndexMap<String, CellValue>,
}

impl TableRow {
  /// Crea una fila con id fresco (token UUID, único pero no secuencial).
  pub fn new(values: IndexMap<String, CellValue>) -> Self {
    Self { id: Uuid::new_v4().to_string(), values }
  }

  pub fn value(&self, column_id: &str) -> Option<&CellValue> {
    self.values.get(column_id)
  }

  pub fn set_value(&mut self, column_id: impl Into<String>, value: CellValue) {
    self.values.insert(column_id.into(), value);
  }

  /// Valida la fila contra un esquema: columnas obligatorias presentes y
  /// con valor no nulo, y cada valor presente con la forma declarada.
  ///
  /// Esta validación es responsabilidad de quien llama antes de mutar el
  /// almacén; el almacén mismo no la aplica.
  pub fn validate_against(&self, schema: &TableSchema) -> Result<(), DomainError> {
    validate_row_values(&self.values, schema)
  }
}

/// Valida un mapa de valores (id de columna → valor) contra un esquema,
/// antes de materializarlo como fila.
pub fn validate_row_values(values: &IndexMap<String, CellValue>, schema: &TableSchema) -> Result<(), DomainError> {
  for column in &schema.columns {
    match values.get(&column.id) {
      None | Some(CellValue::Null) => {
        if column.required {
          return Err(DomainError::ValidationError(format!("Falta valor para la columna obligatoria '{}'",
                                                          column.name)));
        }
      }
      Some(value) => {
        if !column.accepts(value) {
          return Err(DomainError::ValidationError(format!("Valor inválido para la columna '{}' (tipo {})",
                                                          column.name, column.column_type)));
        }
      }
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Column, ColumnType};

  fn users_schema() -> TableSchema {
    TableSchema::new("users",
                     vec![Column::new("id", ColumnType::String).required().unique(),
                          Column::new("age", ColumnType::Number)]).unwrap()
  }

  #[test]
  fn missing_required_column_fails_validation() {
    let schema = users_schema();
    let row = TableRow::new(IndexMap::new());
    assert!(row.validate_against(&schema).is_err());
  }

  #[test]
  fn coerced_values_pass_validation() {
    let schema = users_schema();
    let mut values = IndexMap::new();
    let id_col = schema.column_by_name("id").unwrap();
    let age_col = schema.column_by_name("age").unwrap();
    values.insert(id_col.id.clone(), id_col.coerce_value("u1"));
    values.insert(age_col.id.clone(), age_col.coerce_value("29"));
    let row = TableRow::new(values);
    assert!(row.validate_against(&schema).is_ok());
    assert_eq!(row.value(&age_col.id), Some(&CellValue::Number(29.0)));
  }

  #[test]
  fn wrong_shape_fails_validation() {
    let schema = users_schema();
    let mut values = IndexMap::new();
    let id_col = schema.column_by_name("id").unwrap().id.clone();
    let age_col = schema.column_by_name("age").unwrap().id.clone();
    values.insert(id_col, CellValue::Text("u1".into()));
    values.insert(age_col, CellValue::Text("29".into()));
    let row = TableRow::new(values);
    assert!(row.validate_against(&schema).is_err());
  }
}
