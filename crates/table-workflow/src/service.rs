// Archivo: service.rs
// Propósito: implementar `StudioService`, la capa orquestadora que
// expone las operaciones de alto nivel del editor: CRUD de tablas y
// filas con validación previa, grafo por pestaña con historia,
// undo/redo, y exportación/importación. Esta capa debe ser invocada
// desde la capa de presentación.
use crate::codegen;
use crate::csv;
use crate::errors::WorkflowError;
use crate::export::{parse_import, ExportDocument};
use indexmap::IndexMap;
use pipeline::{Connection, FlowNode, HistoryTracker, NodePayload, NodePosition, TabManager};
use table_domain::{validate_row_values, CellValue, Relationship, StorageAdapter, TableRow, TableSchema};
use table_persistence::TableStore;

/// Servicio de alto nivel del editor.
///
/// Orquesta el almacén de tablas, el gestor de pestañas y el rastreador
/// de historia. La historia pertenece a la pestaña activa: cambiar de
/// pestaña la limpia. Las mutaciones del grafo registran un snapshot
/// salvo durante el replay de un undo/redo, cuya re-notificación se
/// suprime sola.
pub struct StudioService<A: StorageAdapter> {
    store: TableStore<A>,
    tabs: TabManager,
    history: HistoryTracker,
}

impl<A: StorageAdapter> StudioService<A> {
    pub fn new(store: TableStore<A>) -> Self {
        Self { store, tabs: TabManager::new(), history: HistoryTracker::new() }
    }

    pub fn store(&self) -> &TableStore<A> {
        &self.store
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    // --- Tablas y filas -------------------------------------------------

    /// Crea una tabla delegando en el almacén.
    pub fn create_table(&self, schema: TableSchema) -> Result<TableSchema, WorkflowError> {
        Ok(self.store.create_table(schema)?)
    }

    /// Añade una fila validándola antes contra el esquema de la tabla:
    /// columnas obligatorias presentes y formas correctas. La mutación
    /// no se aplica si la validación falla.
    pub fn add_row(&self,
                   table_id: &str,
                   values: IndexMap<String, CellValue>)
                   -> Result<Option<TableRow>, WorkflowError> {
        let table = self.store.get_table_by_id(table_id)?;
        if let Some(table) = table {
            validate_row_values(&values, &table.schema)?;
            Ok(self.store.add_row(table_id, values)?)
        } else {
            Ok(None)
        }
    }

    /// Añade una relación validando aguas arriba que ambas parejas
    /// tabla/columna existan (el almacén mismo no lo comprueba).
    pub fn add_relationship(&self, relationship: Relationship) -> Result<(), WorkflowError> {
        let schema = self.store.schema()?;
        for (table_id, column_id) in [(&relationship.from_table_id, &relationship.from_column_id),
                                      (&relationship.to_table_id, &relationship.to_column_id)]
        {
            let table = schema.table_by_id(table_id)
                              .ok_or_else(|| WorkflowError::Validation(format!("tabla {} no existe", table_id)))?;
            if table.column_by_id(column_id).is_none() {
                return Err(WorkflowError::Validation(format!("columna {} no existe en {}", column_id, table_id)));
            }
        }
        Ok(self.store.add_relationship(relationship)?)
    }

    // --- Pestañas -------------------------------------------------------

    pub fn create_tab(&mut self, name: impl Into<String>) -> String {
        self.tabs.create_tab(name)
    }

    pub fn rename_tab(&mut self, id: &str, name: impl Into<String>) -> Result<(), WorkflowError> {
        Ok(self.tabs.rename_tab(id, name)?)
    }

    pub fn delete_tab(&mut self, id: &str) -> Result<(), WorkflowError> {
        let was_active = self.tabs.active_tab_id() == id;
        self.tabs.delete_tab(id)?;
        if was_active {
            self.history.clear_history();
        }
        Ok(())
    }

    /// Cambia la pestaña activa. La historia es por pestaña: si el
    /// cambio ocurre, el log se resetea.
    pub fn switch_tab(&mut self, id: &str) -> Result<(), WorkflowError> {
        if self.tabs.set_active(id)? {
            self.history.clear_history();
        }
        Ok(())
    }

    // --- Grafo de la pestaña activa -------------------------------------

    /// Registra el estado del grafo activo en la historia. Suprimido
    /// automáticamente durante replay y coalescido dentro de brackets
    /// de interacción.
    fn snapshot_active(&mut self) -> Result<(), WorkflowError> {
        let tab = self.tabs.active_tab();
        self.history.save_state(&tab.nodes, &tab.edges)?;
        Ok(())
    }

    pub fn add_node(&mut self, node: FlowNode) -> Result<String, WorkflowError> {
        let id = self.tabs.active_tab_mut().add_node(node);
        self.snapshot_active()?;
        Ok(id)
    }

    pub fn remove_node(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.tabs.active_tab_mut().remove_node(id);
        self.snapshot_active()
    }

    pub fn move_node(&mut self, id: &str, position: NodePosition) -> Result<(), WorkflowError> {
        self.tabs.active_tab_mut().move_node(id, position);
        self.snapshot_active()
    }

    /// Conecta dos nodos de la pestaña activa. Un candidato rechazado no
    /// muta las aristas ni registra snapshot.
    pub fn connect(&mut self, candidate: Connection) -> Result<String, WorkflowError> {
        let id = self.tabs.active_tab_mut().connect(candidate)?;
        self.snapshot_active()?;
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<(), WorkflowError> {
        self.tabs.active_tab_mut().remove_edge(id);
        self.snapshot_active()
    }

    /// Abre un bracket de interacción (por ejemplo, un arrastre): los
    /// snapshots intermedios se coalescen en uno al cerrar.
    pub fn begin_interaction(&mut self) {
        self.history.begin_interaction();
    }

    pub fn end_interaction(&mut self) -> Result<(), WorkflowError> {
        Ok(self.history.end_interaction()?)
    }

    /// Deshace la última mutación del grafo activo. Devuelve `false` si
    /// no había nada que deshacer.
    pub fn undo(&mut self) -> Result<bool, WorkflowError> {
        match self.history.undo() {
            Some(snapshot) => {
                {
                    let tab = self.tabs.active_tab_mut();
                    tab.nodes = snapshot.nodes;
                    tab.edges = snapshot.edges;
                }
                // La notificación de mutación del apply pasa por el
                // camino normal; el modo replay la suprime.
                self.snapshot_active()?;
                self.history.end_replay();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rehace la mutación deshecha. Devuelve `false` si no había rama
    /// de redo.
    pub fn redo(&mut self) -> Result<bool, WorkflowError> {
        match self.history.redo() {
            Some(snapshot) => {
                {
                    let tab = self.tabs.active_tab_mut();
                    tab.nodes = snapshot.nodes;
                    tab.edges = snapshot.edges;
                }
                self.snapshot_active()?;
                self.history.end_replay();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Genera el script del nodo de proceso dado y lo deja registrado en
    /// el propio nodo.
    pub fn generate_script(&mut self, node_id: &str) -> Result<String, WorkflowError> {
        let script = codegen::generate_script(self.tabs.active_tab(), node_id)?;
        let stored = script.clone();
        self.tabs.active_tab_mut().update_node(node_id, |data| {
            if let NodePayload::Transform { generated_script, .. } = &mut data.payload {
                *generated_script = Some(stored);
            }
        });
        self.snapshot_active()?;
        Ok(script)
    }

    // --- Exportación / importación --------------------------------------

    /// Serializa el documento de exportación completo.
    pub fn export_json(&self) -> Result<String, WorkflowError> {
        let doc = ExportDocument::build(self.store.list_tables()?,
                                        self.store.schema()?.relationships,
                                        self.tabs.tabs().to_vec(),
                                        Some(self.tabs.active_tab_id().to_string()));
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Importa un documento. Se decodifica entero antes de tocar nada:
    /// si está malformado, el estado existente queda intacto.
    pub fn import_json(&mut self, raw: &str) -> Result<(), WorkflowError> {
        let imported = parse_import(raw)?;
        self.store.replace_all(imported.table_data, imported.schema)?;
        self.tabs = TabManager::from_tabs(imported.flow_tabs, imported.active_tab_id);
        self.history.clear_history();
        Ok(())
    }

    /// CSV de la tabla indicada, o `None` si no existe.
    pub fn export_table_csv(&self, table_id: &str) -> Result<Option<String>, WorkflowError> {
        Ok(self.store.get_table_by_id(table_id)?.map(|t| csv::export_table_csv(&t)))
    }

    /// Importa filas CSV contra el esquema de la tabla indicada.
    /// Devuelve cuántas filas se añadieron.
    pub fn import_table_csv(&self, table_id: &str, raw: &str) -> Result<usize, WorkflowError> {
        let table = self.store
                        .get_table_by_id(table_id)?
                        .ok_or_else(|| WorkflowError::Validation(format!("tabla {} no existe", table_id)))?;
        let rows = csv::import_table_csv(&table.schema, raw)?;
        let mut added = 0;
        for values in rows {
            if self.store.add_row(table_id, values)?.is_some() {
                added += 1;
            }
        }
        Ok(added)
    }
}
