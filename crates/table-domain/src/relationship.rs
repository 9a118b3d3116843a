// relationship.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Cardinalidad de una relación entre dos columnas de tablas distintas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
  #[serde(rename = "one-to-one")]
  OneToOne,
  #[serde(rename = "one-to-many")]
  OneToMany,
  #[serde(rename = "many-to-many")]
  ManyToMany,
}

impl fmt::Display for RelationshipType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      RelationshipType::OneToOne => "one-to-one",
      RelationshipType::OneToMany => "one-to-many",
      RelationshipType::ManyToMany => "many-to-many",
    };
    write!(f, "{}", s)
  }
}

/// Relación dirigida entre `fromTable.fromColumn` y `toTable.toColumn`.
///
/// Invariante (mantenido por el almacén, no aquí): ambas parejas
/// tabla/columna existen mientras la relación está viva; al borrar una
/// tabla, toda relación que la mencione se elimina junto con la tabla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
  pub id: String,
  pub from_table_id: String,
  pub from_column_id: String,
  pub to_table_id: String,
  pub to_column_id: String,
  #[serde(rename = "type")]
  pub relationship_type: RelationshipType,
}

impl Relationship {
  pub fn new(from_table_id: impl Into<String>,
             from_column_id: impl Into<String>,
             to_table_id: impl Into<String>,
             to_column_id: impl Into<String>,
             relationship_type: RelationshipType)
             -> Self {
    Self { id: Uuid::new_v4().to_string(),
           from_table_id: from_table_id.into(),
           from_column_id: from_column_id.into(),
           to_table_id: to_table_id.into(),
           to_column_id: to_column_id.into(),
           relationship_type }
  }

  /// ¿La relación menciona a la tabla dada en cualquiera de sus extremos?
  pub fn mentions_table(&self, table_id: &str) -> bool {
    self.from_table_id == table_id || self.to_table_id == table_id
  }
}
