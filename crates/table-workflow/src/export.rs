// Archivo: export.rs
// Propósito: documento de exportación versionado (descarga de archivo)
// y su importación tolerante a las formas históricas.
use crate::errors::WorkflowError;
use chrono::{DateTime, Utc};
use pipeline::FlowTab;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use table_domain::{DatabaseSchema, Relationship, TableData, TableRow, TableSchema};

/// Versión actual del documento de exportación.
pub const EXPORT_VERSION: &str = "2.0";

/// Tabla dentro del documento de exportación: esquema + filas bajo la
/// clave `data` (no `rows`, por compatibilidad con el formato exportado
/// históricamente).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedTable {
    pub schema: TableSchema,
    #[serde(default)]
    pub data: Vec<TableRow>,
}

impl From<TableData> for ExportedTable {
    fn from(t: TableData) -> Self {
        Self { schema: t.schema, data: t.rows }
    }
}

impl From<ExportedTable> for TableData {
    fn from(t: ExportedTable) -> Self {
        Self { schema: t.schema, rows: t.data }
    }
}

/// Documento de exportación completo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub tables: Vec<ExportedTable>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub flow_tabs: Vec<FlowTab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tab_id: Option<String>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn build(tables: Vec<TableData>,
                 relationships: Vec<Relationship>,
                 flow_tabs: Vec<FlowTab>,
                 active_tab_id: Option<String>)
                 -> Self {
        Self { tables: tables.into_iter().map(ExportedTable::from).collect(),
               relationships,
               flow_tabs,
               active_tab_id,
               export_date: Utc::now(),
               version: EXPORT_VERSION.to_string() }
    }
}

/// Conjunto ya decodificado de una importación, listo para aplicarse al
/// almacén y al gestor de pestañas.
#[derive(Debug, Clone)]
pub struct ImportedSet {
    pub table_data: Vec<TableData>,
    pub schema: DatabaseSchema,
    pub flow_tabs: Vec<FlowTab>,
    pub active_tab_id: Option<String>,
}

fn tables_into_set(tables: Vec<ExportedTable>,
                   relationships: Vec<Relationship>,
                   flow_tabs: Vec<FlowTab>,
                   active_tab_id: Option<String>)
                   -> ImportedSet {
    let table_data: Vec<TableData> = tables.into_iter().map(TableData::from).collect();
    let schema = DatabaseSchema { tables: table_data.iter().map(|t| t.schema.clone()).collect(),
                                  relationships };
    ImportedSet { table_data, schema, flow_tabs, active_tab_id }
}

/// Decodifica un documento de importación. Acepta tres formas:
///
/// 1. La forma actual con `flowTabs` y `version`.
/// 2. La forma previa sin `flowTabs`/`version`.
/// 3. La forma legada: array desnudo de tablas `{schema, data}`.
///
/// Un documento malformado produce `WorkflowError::Import`; el llamador
/// no debe haber mutado nada todavía.
pub fn parse_import(raw: &str) -> Result<ImportedSet, WorkflowError> {
    let value: JsonValue =
        serde_json::from_str(raw).map_err(|e| WorkflowError::Import(format!("JSON inválido: {}", e)))?;
    match value {
        JsonValue::Object(mut obj) => {
            let tables_raw = obj.remove("tables")
                                .ok_or_else(|| WorkflowError::Import("falta la clave 'tables'".to_string()))?;
            let tables: Vec<ExportedTable> = serde_json::from_value(tables_raw)
                .map_err(|e| WorkflowError::Import(format!("tablas malformadas: {}", e)))?;
            let relationships: Vec<Relationship> = match obj.remove("relationships") {
                Some(raw_rels) => serde_json::from_value(raw_rels)
                    .map_err(|e| WorkflowError::Import(format!("relaciones malformadas: {}", e)))?,
                None => Vec::new(),
            };
            let flow_tabs: Vec<FlowTab> = match obj.remove("flowTabs") {
                Some(raw_tabs) => serde_json::from_value(raw_tabs)
                    .map_err(|e| WorkflowError::Import(format!("pestañas malformadas: {}", e)))?,
                None => Vec::new(),
            };
            let active_tab_id = obj.remove("activeTabId").and_then(|v| v.as_str().map(str::to_string));
            Ok(tables_into_set(tables, relationships, flow_tabs, active_tab_id))
        }
        JsonValue::Array(_) => {
            let tables: Vec<ExportedTable> = serde_json::from_value(value)
                .map_err(|e| WorkflowError::Import(format!("tablas malformadas: {}", e)))?;
            Ok(tables_into_set(tables, Vec::new(), Vec::new(), None))
        }
        _ => Err(WorkflowError::Import("forma de documento no reconocida".to_string())),
    }
}
