// database_schema.rs
use crate::{Relationship, TableSchema};
use serde::{Deserialize, Serialize};

/// Agregado de todos los esquemas de tabla más todas las relaciones.
///
/// Invariante: `tables` se mantiene sincronizado con las copias de
/// esquema que viven junto a los datos de fila (`TableData.schema`); las
/// dos nunca divergen en membresía ni en contenido. El almacén es el
/// responsable de mantenerlo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
  #[serde(default)]
  pub tables: Vec<TableSchema>,
  #[serde(default)]
  pub relationships: Vec<Relationship>,
}

impl DatabaseSchema {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn table_by_id(&self, id: &str) -> Option<&TableSchema> {
    self.tables.iter().find(|t| t.id == id)
  }

  /// Inserta o reemplaza la entrada correspondiente al esquema dado.
  pub fn upsert_table(&mut self, schema: TableSchema) {
    match self.tables.iter_mut().find(|t| t.id == schema.id) {
      Some(existing) => *existing = schema,
      None => self.tables.push(schema),
    }
  }

  /// Elimina la tabla y, de forma atómica con ella, toda relación que la
  /// mencione en cualquiera de sus extremos.
  pub fn remove_table(&mut self, table_id: &str) {
    self.tables.retain(|t| t.id != table_id);
    self.relationships.retain(|r| !r.mentions_table(table_id));
  }

  pub fn add_relationship(&mut self, relationship: Relationship) {
    self.relationships.push(relationship);
  }

  pub fn remove_relationship(&mut self, relationship_id: &str) {
    self.relationships.retain(|r| r.id != relationship_id);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Column, ColumnType, RelationshipType};

  #[test]
  fn remove_table_prunes_relationships_atomically() {
    let a = TableSchema::new("A", vec![Column::new("col1", ColumnType::String)]).unwrap();
    let b = TableSchema::new("B", vec![Column::new("col2", ColumnType::String)]).unwrap();
    let rel = Relationship::new(a.id.clone(),
                                a.columns[0].id.clone(),
                                b.id.clone(),
                                b.columns[0].id.clone(),
                                RelationshipType::OneToMany);
    let mut schema = DatabaseSchema::new();
    schema.upsert_table(a.clone());
    schema.upsert_table(b.clone());
    schema.add_relationship(rel);

    schema.remove_table(&a.id);
    assert!(schema.table_by_id(&a.id).is_none());
    assert!(schema.table_by_id(&b.id).is_some());
    assert!(schema.relationships.is_empty());
  }

  #[test]
  fn upsert_replaces_existing_entry() {
    let mut t = TableSchema::new("A", vec![]).unwrap();
    let mut schema = DatabaseSchema::new();
    schema.upsert_table(t.clone());
    t.name = "A2".into();
    schema.upsert_table(t.clone());
    assert_eq!(schema.tables.len(), 1);
    assert_eq!(schema.tables[0].name, "A2");
  }
}
