use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use table_domain::{DatabaseSchema, StoreSnapshot, TableData};

/// Clave fija bajo la que vive el documento persistido.
pub const STORAGE_KEY: &str = "table-management-data";

/// Documento persistido completo: todas las tablas con sus filas, el
/// esquema agregado y la marca de última modificación. Se escribe
/// siempre entero (sin escrituras parciales).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
  pub table_data: Vec<TableData>,
  pub schema: DatabaseSchema,
  pub last_modified: DateTime<Utc>,
}

impl PersistedDocument {
  pub fn stamp(table_data: Vec<TableData>, schema: DatabaseSchema) -> Self {
    Self { table_data, schema, last_modified: Utc::now() }
  }
}

/// Reconstruye el esquema agregado a partir de las copias por tabla.
/// Usado para las formas históricas del documento que no lo incluían.
fn rebuild_schema(table_data: &[TableData]) -> DatabaseSchema {
  DatabaseSchema { tables: table_data.iter().map(|t| t.schema.clone()).collect(),
                   relationships: Vec::new() }
}

/// Decodifica un documento tolerando las tres formas históricas:
///
/// 1. Forma versionada actual: objeto con `tableData` y `schema`.
/// 2. Forma previa: objeto con `tableData` pero sin `schema` explícito;
///    el esquema se reconstruye desde las copias por tabla.
/// 3. Forma legada: array desnudo de tablas.
///
/// Cualquier otra forma devuelve `None`; quien llama resuelve al estado
/// vacío en lugar de a un error.
pub fn decode_document(value: JsonValue) -> Option<StoreSnapshot> {
  match value {
    JsonValue::Object(mut obj) => {
      let raw = obj.remove("tableData")?;
      let table_data: Vec<TableData> = serde_json::from_value(raw).ok()?;
      let schema = match obj.remove("schema") {
        Some(raw_schema) => serde_json::from_value(raw_schema).ok()?,
        None => rebuild_schema(&table_data),
      };
      Some(StoreSnapshot { table_data, schema })
    }
    JsonValue::Array(_) => {
      let table_data: Vec<TableData> = serde_json::from_value(value).ok()?;
      let schema = rebuild_schema(&table_data);
      Some(StoreSnapshot { table_data, schema })
    }
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn sample_table_json() -> JsonValue {
    json!({
      "schema": {
        "id": "t1",
        "name": "users",
        "columns": [
          {"id": "c1", "name": "id", "type": "string", "required": true, "unique": true, "isList": false}
        ]
      },
      "rows": [{"id": "r1", "c1": "u1"}]
    })
  }

  #[test]
  fn decodes_current_versioned_shape() {
    let doc = json!({
      "tableData": [sample_table_json()],
      "schema": {"tables": [sample_table_json()["schema"]], "relationships": []},
      "lastModified": "2026-01-01T00:00:00Z"
    });
    let snap = decode_document(doc).expect("decode");
    assert_eq!(snap.table_data.len(), 1);
    assert_eq!(snap.schema.tables.len(), 1);
  }

  #[test]
  fn decodes_shape_without_schema_by_rebuilding_it() {
    let doc = json!({"tableData": [sample_table_json()]});
    let snap = decode_document(doc).expect("decode");
    assert_eq!(snap.schema.tables.len(), 1);
    assert_eq!(snap.schema.tables[0].id, "t1");
    assert!(snap.schema.relationships.is_empty());
  }

  #[test]
  fn decodes_legacy_bare_array_shape() {
    let doc = json!([sample_table_json()]);
    let snap = decode_document(doc).expect("decode");
    assert_eq!(snap.table_data.len(), 1);
    assert_eq!(snap.schema.tables.len(), 1);
  }

  #[test]
  fn unrecognized_shapes_yield_none() {
    assert!(decode_document(json!("garbage")).is_none());
    assert!(decode_document(json!(42)).is_none());
    assert!(decode_document(json!({"other": true})).is_none());
  }
}
