//! table-workflow: orquestación del estudio de pipelines de tablas
//!
//! Crate que une el almacén (`table-persistence`), el modelo de grafo
//! con su historia (`pipeline`) y las superficies de intercambio:
//! exportación/importación JSON versionada, CSV por tabla y generación
//! de scripts para nodos de proceso.

pub mod codegen;
pub mod csv;
pub mod errors;
pub mod export;
pub mod service;

pub use codegen::generate_script;
pub use csv::{export_table_csv, import_table_csv};
pub use errors::WorkflowError;
pub use export::{parse_import, ExportDocument, ExportedTable, ImportedSet, EXPORT_VERSION};
pub use service::StudioService;
