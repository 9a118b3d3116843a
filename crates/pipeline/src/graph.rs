// Archivo: graph.rs
// Propósito: mutadores del grafo por pestaña y la regla que decide si
// una conexión propuesta es legal.
use crate::domain::{Connection, FlowEdge, FlowNode, FlowTab, NodeCategory, NodeData, NodePosition, INPUT_HANDLE,
                    OUTPUT_HANDLE};
use crate::errors::{PipelineError, Result};
use chrono::Utc;
use uuid::Uuid;

impl FlowTab {
    pub fn node_by_id(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge_by_id(&self, id: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Añade un nodo a la pestaña y devuelve su id.
    pub fn add_node(&mut self, node: FlowNode) -> String {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Aplica una mutación al `data` del nodo y estampa `updated_at`.
    /// No-op silencioso si el nodo no existe.
    pub fn update_node<F>(&mut self, id: &str, mutate: F)
        where F: FnOnce(&mut NodeData)
    {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            mutate(&mut node.data);
            node.data.updated_at = Utc::now();
        }
    }

    /// Reposiciona un nodo. No estampa `updated_at`: mover no cambia el
    /// contenido del nodo. No-op silencioso si no existe.
    pub fn move_node(&mut self, id: &str, position: NodePosition) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.position = position;
        }
    }

    /// Elimina un nodo y, con él, toda arista que lo referencie como
    /// origen o destino. No se permiten aristas colgantes.
    pub fn remove_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.source != id && e.target != id);
    }

    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
    }

    /// Decide si un candidato de conexión es legal sobre esta pestaña.
    ///
    /// Reglas: sin lazos (source == target); ambos extremos deben
    /// existir; el handle de origen debe tener rol de salida y el de
    /// destino rol de entrada; y las categorías deben formar
    /// {Storage|Miscellaneous → Transform} o
    /// {Transform → Storage|Miscellaneous}.
    pub fn is_valid_connection(&self, candidate: &Connection) -> bool {
        if candidate.source == candidate.target {
            return false;
        }
        let (source, target) = match (self.node_by_id(&candidate.source), self.node_by_id(&candidate.target)) {
            (Some(s), Some(t)) => (s, t),
            _ => return false,
        };
        if !candidate.resolved_source_handle().starts_with(OUTPUT_HANDLE) {
            return false;
        }
        if !candidate.resolved_target_handle().starts_with(INPUT_HANDLE) {
            return false;
        }
        matches!((source.category(), target.category()),
                 (NodeCategory::Storage, NodeCategory::Transform)
                 | (NodeCategory::Miscellaneous, NodeCategory::Transform)
                 | (NodeCategory::Transform, NodeCategory::Storage)
                 | (NodeCategory::Transform, NodeCategory::Miscellaneous))
    }

    /// Materializa un candidato válido como arista animada y devuelve su
    /// id. Un candidato rechazado no muta la colección de aristas.
    pub fn connect(&mut self, candidate: Connection) -> Result<String> {
        if !self.is_valid_connection(&candidate) {
            return Err(PipelineError::InvalidConnection(format!("{} -> {}", candidate.source, candidate.target)));
        }
        let edge = FlowEdge { id: Uuid::new_v4().to_string(),
                              source: candidate.source,
                              target: candidate.target,
                              source_handle: candidate.source_handle,
                              target_handle: candidate.target_handle,
                              animated: true };
        let id = edge.id.clone();
        self.edges.push(edge);
        Ok(id)
    }

    /// Ids de los nodos Storage que alimentan (aristas entrantes) al nodo
    /// dado. Usado por la generación de scripts.
    pub fn incoming_storage_nodes(&self, node_id: &str) -> Vec<&FlowNode> {
        self.edges
            .iter()
            .filter(|e| e.target == node_id)
            .filter_map(|e| self.node_by_id(&e.source))
            .filter(|n| n.category() == NodeCategory::Storage)
            .collect()
    }
}
