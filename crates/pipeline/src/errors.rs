// Archivo: errors.rs
// Propósito: definir los errores del modelo de pipeline y el alias
// Result<T> usado por las APIs del crate.
use thiserror::Error;
/// Errores comunes del modelo de pipeline.
///
/// - `NotFound`: entidad no encontrada (pestaña, nodo, arista).
/// - `InvalidConnection`: conexión propuesta rechazada por las reglas.
/// - `ReservedTab`: operación de CRUD sobre una pestaña reservada.
/// - `Serialization`: fallo al serializar un snapshot.
/// - `Other`: cualquier otro error.
#[derive(Error, Debug)]
pub enum PipelineError {
  /// Entidad no encontrada (por ejemplo, pestaña o nodo).
  #[error("No encontrado: {0}")]
  NotFound(String),
  /// Conexión propuesta que viola las reglas de validez.
  #[error("Conexión inválida: {0}")]
  InvalidConnection(String),
  /// Las pestañas reservadas no admiten renombrar ni borrar.
  #[error("Pestaña reservada: {0}")]
  ReservedTab(String),
  /// Error de serialización de snapshots.
  #[error("Error de serialización: {0}")]
  Serialization(String),
  /// Otro tipo de error.
  #[error("Otro: {0}")]
  Other(String),
}
/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
