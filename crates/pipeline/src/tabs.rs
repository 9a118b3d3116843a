// Archivo: tabs.rs
// Propósito: gestión de pestañas del editor. Un conjunto fijo de ids
// reservados denota vistas que no son grafos (editor de tablas,
// diseñador de esquema, importación/exportación) y queda excluido del
// CRUD normal de pestañas.
use crate::domain::FlowTab;
use crate::errors::{PipelineError, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Ids de pestañas reservadas: vistas fijas, sin grafo ni historia.
pub static RESERVED_TAB_IDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["tables", "schema", "import-export"]));

pub fn is_reserved_tab(id: &str) -> bool {
    RESERVED_TAB_IDS.contains(id)
}

/// Colección ordenada de pestañas de grafo más la pestaña activa.
///
/// Las pestañas reservadas no viven aquí: este gestor solo contiene
/// pestañas de grafo; las operaciones que reciben un id reservado se
/// rechazan con `PipelineError::ReservedTab`.
#[derive(Debug, Clone)]
pub struct TabManager {
    tabs: Vec<FlowTab>,
    active_tab_id: String,
}

impl TabManager {
    /// Crea el gestor con una pestaña inicial activa.
    pub fn new() -> Self {
        let initial = FlowTab::new("Flow 1");
        let active_tab_id = initial.id.clone();
        Self { tabs: vec![initial], active_tab_id }
    }

    /// Reconstruye el gestor desde pestañas importadas. Si `active_id` no
    /// resuelve a una pestaña existente, la primera queda activa; una
    /// lista vacía recibe la pestaña inicial por defecto.
    pub fn from_tabs(tabs: Vec<FlowTab>, active_id: Option<String>) -> Self {
        if tabs.is_empty() {
            return Self::new();
        }
        let active_tab_id = active_id.filter(|id| tabs.iter().any(|t| &t.id == id))
                                     .unwrap_or_else(|| tabs[0].id.clone());
        Self { tabs, active_tab_id }
    }

    pub fn tabs(&self) -> &[FlowTab] {
        &self.tabs
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn tab_by_id(&self, id: &str) -> Option<&FlowTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tab_by_id_mut(&mut self, id: &str) -> Option<&mut FlowTab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active_tab(&self) -> &FlowTab {
        // Invariante interna: active_tab_id siempre resuelve.
        self.tab_by_id(&self.active_tab_id).expect("pestaña activa inexistente")
    }

    pub fn active_tab_mut(&mut self) -> &mut FlowTab {
        let id = self.active_tab_id.clone();
        self.tab_by_id_mut(&id).expect("pestaña activa inexistente")
    }

    /// Crea una pestaña nueva y devuelve su id. No la activa.
    pub fn create_tab(&mut self, name: impl Into<String>) -> String {
        let tab = FlowTab::new(name);
        let id = tab.id.clone();
        self.tabs.push(tab);
        id
    }

    /// Renombra una pestaña. Ids reservados se rechazan.
    pub fn rename_tab(&mut self, id: &str, name: impl Into<String>) -> Result<()> {
        if is_reserved_tab(id) {
            return Err(PipelineError::ReservedTab(id.to_string()));
        }
        match self.tab_by_id_mut(id) {
            Some(tab) => {
                tab.name = name.into();
                Ok(())
            }
            None => Err(PipelineError::NotFound(format!("pestaña {}", id))),
        }
    }

    /// Elimina una pestaña. Ids reservados se rechazan y la última
    /// pestaña ordinaria no puede eliminarse. Si la pestaña activa cae,
    /// la primera restante pasa a ser la activa.
    pub fn delete_tab(&mut self, id: &str) -> Result<()> {
        if is_reserved_tab(id) {
            return Err(PipelineError::ReservedTab(id.to_string()));
        }
        if self.tab_by_id(id).is_none() {
            return Err(PipelineError::NotFound(format!("pestaña {}", id)));
        }
        if self.tabs.len() == 1 {
            return Err(PipelineError::Other("no se puede eliminar la última pestaña".to_string()));
        }
        self.tabs.retain(|t| t.id != id);
        if self.active_tab_id == id {
            self.active_tab_id = self.tabs[0].id.clone();
        }
        Ok(())
    }

    /// Activa una pestaña existente. Devuelve `true` si la pestaña
    /// activa cambió (la historia debe limpiarse en ese caso).
    pub fn set_active(&mut self, id: &str) -> Result<bool> {
        if self.tab_by_id(id).is_none() {
            return Err(PipelineError::NotFound(format!("pestaña {}", id)));
        }
        if self.active_tab_id == id {
            return Ok(false);
        }
        self.active_tab_id = id.to_string();
        Ok(true)
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}
