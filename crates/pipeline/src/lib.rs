//! Crate `pipeline` — modelo del grafo de pipelines y su historia
//!
//! Este crate define los tipos del lienzo (`FlowNode`, `FlowEdge`,
//! `FlowTab`), la regla de validez de conexiones, la gestión de
//! pestañas con ids reservados y el rastreador de historia acotado
//! (`HistoryTracker`) para undo/redo.
//!
//! Diseño resumido:
//! - Grafo por pestaña: cada `FlowTab` posee sus nodos y aristas; al
//!   borrar un nodo caen también sus aristas (sin aristas colgantes).
//! - Conexiones validadas en creación: solo
//!   {Storage|Miscellaneous → Transform} o
//!   {Transform → Storage|Miscellaneous}, sin lazos.
//! - Historia lineal acotada: snapshots inmutables, cursor móvil,
//!   supresión de pushes durante el replay y deduplicación estructural
//!   de snapshots consecutivos.
//!
//! Ejemplo rápido:
//! ```rust
//! use pipeline::{Connection, FlowNode, FlowTab, NodePosition};
//! let mut tab = FlowTab::new("demo");
//! let a = tab.add_node(FlowNode::storage("usuarios", NodePosition::new(0.0, 0.0), "users", vec![]));
//! let b = tab.add_node(FlowNode::transform("filtrar", NodePosition::new(200.0, 0.0), vec![], "age > 18"));
//! assert!(tab.connect(Connection::new(a, b)).is_ok());
//! ```
pub mod domain;
pub mod errors;
pub mod graph;
pub mod history;
pub mod tabs;

pub use domain::*;
pub use errors::*;
pub use history::*;
pub use tabs::*;
