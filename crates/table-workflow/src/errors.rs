use thiserror::Error;

// Errores comunes de la capa de orquestación del estudio.
//
// Este enum centraliza los errores que pueden ocurrir al operar el
// editor: errores del modelo de pipeline (`PipelineError`), errores del
// dominio/persistencia (`DomainError`), importaciones malformadas,
// validaciones y errores de serializacion.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Errores originados por el modelo de pipeline (grafo, pestañas,
  /// historia).
  #[error("Error de pipeline: {0}")]
  Pipeline(#[from] pipeline::PipelineError),

  /// Errores originados por el dominio de tablas o su persistencia.
  #[error("Error de dominio: {0}")]
  Domain(#[from] table_domain::DomainError),

  /// Documento de importación malformado. El estado existente queda
  /// intacto; el mensaje es recuperable a nivel de interacción.
  #[error("Importación fallida: {0}")]
  Import(String),

  /// Errores de serializacion/deserializacion JSON.
  #[error("Error de serializacion: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Errores de validacion local (por ejemplo nodo de proceso
  /// inexistente al generar un script).
  #[error("Error de validacion: {0}")]
  Validation(String),

  /// Error generico: captura otros tipos de errores no tipados.
  #[error("Otro error: {0}")]
  Other(String),
}
