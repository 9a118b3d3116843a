// Archivo: domain.rs
// Propósito: definir los tipos del modelo de pipeline (`FlowNode`,
// `FlowEdge`, `FlowTab`) y el candidato de conexión (`Connection`).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identificadores canónicos de los handles de conexión. Un candidato
/// sin handle explícito se resuelve a estos valores.
pub const OUTPUT_HANDLE: &str = "output";
pub const INPUT_HANDLE: &str = "input";

/// Posición 2-D de un nodo sobre el lienzo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f64,
    pub y: f64,
}

impl NodePosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Categoría de un nodo. Decide qué conexiones son legales y qué campos
/// específicos lleva su `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    Storage,
    Transform,
    Miscellaneous,
}

/// Columna declarada sobre un nodo (nombre + tipo textual). La capa de
/// nodos está desacoplada de los esquemas de tabla: el tipo viaja como
/// texto libre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl NodeColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self { name: name.into(), data_type: data_type.into() }
    }
}

/// Carga específica por categoría del `data` de un nodo.
///
/// - `Storage`: nombre de tabla + columnas en orden.
/// - `Transform`: columnas de salida, lógica del proceso y script
///   generado opcional.
/// - `Miscellaneous`: sin campos extra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum NodePayload {
    Storage {
        #[serde(rename = "tableName")]
        table_name: String,
        #[serde(default)]
        columns: Vec<NodeColumn>,
    },
    Transform {
        #[serde(rename = "outputColumns", default)]
        output_columns: Vec<NodeColumn>,
        #[serde(rename = "processLogic", default)]
        process_logic: String,
        #[serde(rename = "generatedScript", default, skip_serializing_if = "Option::is_none")]
        generated_script: Option<String>,
    },
    Miscellaneous,
}

impl NodePayload {
    pub fn category(&self) -> NodeCategory {
        match self {
            NodePayload::Storage { .. } => NodeCategory::Storage,
            NodePayload::Transform { .. } => NodeCategory::Transform,
            NodePayload::Miscellaneous => NodeCategory::Miscellaneous,
        }
    }
}

/// Registro `data` de un nodo: etiqueta, metadatos de presentación,
/// marcas de tiempo y la carga específica de su categoría.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: NodePayload,
}

/// Nodo del pipeline sobre un lienzo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: NodePosition,
    pub data: NodeData,
}

impl FlowNode {
    fn with_payload(label: impl Into<String>, node_type: &str, position: NodePosition, payload: NodePayload) -> Self {
        let now = Utc::now();
        Self { id: Uuid::new_v4().to_string(),
               node_type: node_type.to_string(),
               position,
               data: NodeData { label: label.into(),
                                description: None,
                                color: None,
                                created_at: now,
                                updated_at: now,
                                payload } }
    }

    /// Crea un nodo de datos (Storage) con su tabla y columnas.
    pub fn storage(label: impl Into<String>,
                   position: NodePosition,
                   table_name: impl Into<String>,
                   columns: Vec<NodeColumn>)
                   -> Self {
        Self::with_payload(label,
                           "dataNode",
                           position,
                           NodePayload::Storage { table_name: table_name.into(), columns })
    }

    /// Crea un nodo de proceso (Transform) con sus columnas de salida.
    pub fn transform(label: impl Into<String>,
                     position: NodePosition,
                     output_columns: Vec<NodeColumn>,
                     process_logic: impl Into<String>)
                     -> Self {
        Self::with_payload(label,
                           "processNode",
                           position,
                           NodePayload::Transform { output_columns,
                                                    process_logic: process_logic.into(),
                                                    generated_script: None })
    }

    /// Crea un nodo misceláneo (anotaciones, marcadores).
    pub fn miscellaneous(label: impl Into<String>, position: NodePosition) -> Self {
        Self::with_payload(label, "miscNode", position, NodePayload::Miscellaneous)
    }

    pub fn category(&self) -> NodeCategory {
        self.data.payload.category()
    }
}

/// Arista dirigida entre dos nodos del pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

/// Candidato de conexión tal como llega del gesto de arrastre. Los
/// handles ausentes se resuelven a los canónicos al validar.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into(), source_handle: None, target_handle: None }
    }

    pub fn with_handles(mut self, source_handle: impl Into<String>, target_handle: impl Into<String>) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }

    /// Handle de origen resuelto (canónico si no se especificó).
    pub fn resolved_source_handle(&self) -> &str {
        self.source_handle.as_deref().unwrap_or(OUTPUT_HANDLE)
    }

    /// Handle de destino resuelto (canónico si no se especificó).
    pub fn resolved_target_handle(&self) -> &str {
        self.target_handle.as_deref().unwrap_or(INPUT_HANDLE)
    }
}

/// Pestaña: colección independiente y nombrada de nodos y aristas, con
/// su propia historia de undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTab {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    pub created_at: DateTime<Utc>,
}

impl FlowTab {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(),
               name: name.into(),
               nodes: Vec::new(),
               edges: Vec::new(),
               created_at: Utc::now() }
    }
}
