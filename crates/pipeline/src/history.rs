// Archivo: history.rs
// Propósito: implementar el rastreador de historia (undo/redo) sobre un
// log acotado, append-only, con un cursor móvil.
//
// Máquina de estados: "idle" (acepta snapshots nuevos) y "replaying"
// (se está aplicando un undo/redo). Mientras se reproduce, los pushes
// de snapshot disparados como efecto secundario de aplicar el estado
// reproducido se suprimen; de lo contrario el undo/redo corrompería su
// propia historia.
use crate::domain::{FlowEdge, FlowNode, FlowTab};
use crate::errors::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Tope del log de historia: se retienen los 50 snapshots más recientes.
pub const HISTORY_CAP: usize = 50;

/// Snapshot inmutable del grafo de una pestaña en un instante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl HistoryEntry {
    pub fn empty() -> Self {
        Self { nodes: Vec::new(), edges: Vec::new() }
    }

    pub fn of_tab(tab: &FlowTab) -> Self {
        Self { nodes: tab.nodes.clone(), edges: tab.edges.clone() }
    }
}

/// Entrada registrada: snapshot más su huella estructural.
#[derive(Debug, Clone)]
struct Recorded {
    digest: String,
    entry: HistoryEntry,
}

fn structural_digest(entry: &HistoryEntry) -> Result<String> {
    let bytes = serde_json::to_vec(entry).map_err(|e| PipelineError::Serialization(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Rastreador de historia por pestaña.
///
/// Semántica de historia lineal estándar: un snapshot nuevo tras un
/// undo descarta la rama de redo. El log se acota a `HISTORY_CAP`
/// entradas desalojando por el extremo más antiguo; el cursor conserva
/// su posición relativa.
#[derive(Debug)]
pub struct HistoryTracker {
    entries: Vec<Recorded>,
    cursor: usize,
    replaying: bool,
    interaction_depth: u32,
    pending: Option<HistoryEntry>,
}

impl HistoryTracker {
    /// Crea el rastreador con un único snapshot vacío como base.
    pub fn new() -> Self {
        let base = HistoryEntry::empty();
        // El snapshot vacío serializa siempre; el digest no puede fallar.
        let digest = structural_digest(&base).unwrap_or_default();
        Self { entries: vec![Recorded { digest, entry: base }],
               cursor: 0,
               replaying: false,
               interaction_depth: 0,
               pending: None }
    }

    /// Registra un snapshot del grafo dado.
    ///
    /// - No-op mientras se reproduce un undo/redo.
    /// - Dentro de un bracket de interacción, solo se retiene el último
    ///   estado; el snapshot real se registra al cerrar el bracket.
    /// - Un snapshot estructuralmente idéntico al actual no se registra
    ///   (evita entradas no-op por notificaciones redundantes).
    pub fn save_state(&mut self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Result<()> {
        if self.replaying {
            return Ok(());
        }
        let entry = HistoryEntry { nodes: nodes.to_vec(), edges: edges.to_vec() };
        if self.interaction_depth > 0 {
            self.pending = Some(entry);
            return Ok(());
        }
        self.push_entry(entry)
    }

    fn push_entry(&mut self, entry: HistoryEntry) -> Result<()> {
        let digest = structural_digest(&entry)?;
        // Descartar la rama de redo antes de comparar contra el actual.
        self.entries.truncate(self.cursor + 1);
        if self.entries[self.cursor].digest == digest {
            return Ok(());
        }
        self.entries.push(Recorded { digest, entry });
        self.cursor = self.entries.len() - 1;
        if self.entries.len() > HISTORY_CAP {
            let excess = self.entries.len() - HISTORY_CAP;
            self.entries.drain(0..excess);
            self.cursor -= excess;
        }
        Ok(())
    }

    /// Retrocede el cursor y entra en modo replay. Devuelve el snapshot
    /// a aplicar, o `None` si el cursor ya está en la entrada más
    /// antigua. El llamador aplica el estado y cierra con `end_replay`.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.replaying = true;
        Some(self.entries[self.cursor].entry.clone())
    }

    /// Avanza el cursor y entra en modo replay. Devuelve el snapshot a
    /// aplicar, o `None` si el cursor ya está en la entrada más nueva.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.replaying = true;
        Some(self.entries[self.cursor].entry.clone())
    }

    /// Sale del modo replay. Debe llamarse tras aplicar el estado y
    /// notificar a las capas superiores.
    pub fn end_replay(&mut self) {
        self.replaying = false;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Resetea el log a un único snapshot vacío con cursor 0. Se usa al
    /// cambiar de pestaña: la historia es por pestaña, no global.
    pub fn clear_history(&mut self) {
        *self = Self::new();
    }

    /// Lectura pura del snapshot bajo el cursor.
    pub fn current_state(&self) -> &HistoryEntry {
        &self.entries[self.cursor].entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Abre un bracket de interacción: los `save_state` intermedios
    /// (por ejemplo, los producidos por un arrastre) se coalescen en un
    /// único snapshot al cerrar.
    pub fn begin_interaction(&mut self) {
        self.interaction_depth += 1;
    }

    /// Cierra el bracket. Al cerrar el más externo se registra un único
    /// snapshot con el último estado observado.
    pub fn end_interaction(&mut self) -> Result<()> {
        self.interaction_depth = self.interaction_depth.saturating_sub(1);
        if self.interaction_depth == 0 {
            if let Some(entry) = self.pending.take() {
                return self.push_entry(entry);
            }
        }
        Ok(())
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new()
    }
}
