use indexmap::IndexMap;
use std::sync::Arc;
use table_domain::{CellValue, Column, ColumnType, DomainError, InMemoryStorageAdapter, Relationship,
                   RelationshipType, StorageAdapter, TableSchema};
use table_persistence::{TableSchemaPatch, TableStore};

fn store() -> (Arc<InMemoryStorageAdapter>, TableStore<InMemoryStorageAdapter>) {
  let adapter = Arc::new(InMemoryStorageAdapter::new());
  (adapter.clone(), TableStore::new(adapter))
}

fn users_schema() -> TableSchema {
  TableSchema::new("users",
                   vec![Column::new("id", ColumnType::String).required().unique(),
                        Column::new("age", ColumnType::Number)]).unwrap()
}

#[test]
fn aggregate_schema_never_diverges_from_per_table_copies() {
  let (_, store) = store();
  store.create_table(TableSchema::new("A", vec![]).unwrap()).unwrap();
  let b = store.create_table(TableSchema::new("B", vec![]).unwrap()).unwrap();
  let c = store.create_table(TableSchema::new("C", vec![]).unwrap()).unwrap();
  store.delete_table(&b.id).unwrap();
  store.update_table(&c.id, TableSchemaPatch { name: Some("C2".into()), ..Default::default() }).unwrap();

  let tables = store.list_tables().unwrap();
  let aggregate = store.schema().unwrap();
  let per_table: Vec<&TableSchema> = tables.iter().map(|t| &t.schema).collect();
  assert_eq!(aggregate.tables.len(), per_table.len());
  for schema in per_table {
    assert_eq!(aggregate.table_by_id(&schema.id), Some(schema));
  }
}

#[test]
fn create_table_assigns_deterministic_grid_positions() {
  let (_, store) = store();
  let mut positions = Vec::new();
  for i in 0..4 {
    let t = store.create_table(TableSchema::new(format!("t{}", i), vec![]).unwrap()).unwrap();
    positions.push(t.position.expect("assigned position"));
  }
  assert_eq!((positions[0].x, positions[0].y), (100.0, 100.0));
  assert_eq!((positions[1].x, positions[1].y), (450.0, 100.0));
  assert_eq!((positions[2].x, positions[2].y), (800.0, 100.0));
  // fourth table wraps to the second grid row
  assert_eq!((positions[3].x, positions[3].y), (100.0, 400.0));
}

#[test]
fn explicit_position_is_preserved() {
  let (_, store) = store();
  let schema = TableSchema::new("placed", vec![]).unwrap()
                                                 .with_position(table_domain::Position::new(7.0, 9.0));
  let created = store.create_table(schema).unwrap();
  assert_eq!(created.position, Some(table_domain::Position::new(7.0, 9.0)));
}

#[test]
fn update_table_with_unknown_id_is_a_silent_noop() {
  let (adapter, store) = store();
  store.create_table(users_schema()).unwrap();
  let persisted_before = adapter.persisted().unwrap();
  store.update_table("missing", TableSchemaPatch { name: Some("x".into()), ..Default::default() }).unwrap();
  assert_eq!(adapter.persisted().unwrap(), persisted_before);
}

#[test]
fn delete_table_prunes_exactly_its_relationships() {
  let (_, store) = store();
  let a = store.create_table(TableSchema::new("A", vec![Column::new("col1", ColumnType::String)]).unwrap()).unwrap();
  let b = store.create_table(TableSchema::new("B", vec![Column::new("col2", ColumnType::String)]).unwrap()).unwrap();
  let c = store.create_table(TableSchema::new("C", vec![Column::new("col3", ColumnType::String)]).unwrap()).unwrap();

  store.add_relationship(Relationship::new(a.id.clone(),
                                           a.columns[0].id.clone(),
                                           b.id.clone(),
                                           b.columns[0].id.clone(),
                                           RelationshipType::OneToMany)).unwrap();
  let survivor = Relationship::new(b.id.clone(),
                                   b.columns[0].id.clone(),
                                   c.id.clone(),
                                   c.columns[0].id.clone(),
                                   RelationshipType::OneToOne);
  store.add_relationship(survivor.clone()).unwrap();

  store.delete_table(&a.id).unwrap();
  let schema = store.schema().unwrap();
  assert_eq!(schema.relationships.len(), 1);
  assert_eq!(schema.relationships[0].id, survivor.id);
  // B keeps its data intact
  assert!(store.get_table_by_id(&b.id).unwrap().is_some());
}

#[test]
fn deleting_either_endpoint_empties_the_relationship_list() {
  let (_, store) = store();
  let a = store.create_table(TableSchema::new("A", vec![Column::new("col1", ColumnType::String)]).unwrap()).unwrap();
  let b = store.create_table(TableSchema::new("B", vec![Column::new("col2", ColumnType::String)]).unwrap()).unwrap();
  store.add_relationship(Relationship::new(a.id.clone(),
                                           a.columns[0].id.clone(),
                                           b.id.clone(),
                                           b.columns[0].id.clone(),
                                           RelationshipType::ManyToMany)).unwrap();

  store.delete_table(&a.id).unwrap();
  assert!(store.schema().unwrap().relationships.is_empty());
  assert!(store.get_table_by_id(&b.id).unwrap().is_some());
}

#[test]
fn row_lifecycle_with_coerced_values() {
  let (_, store) = store();
  let schema = store.create_table(users_schema()).unwrap();
  let id_col = schema.column_by_name("id").unwrap().clone();
  let age_col = schema.column_by_name("age").unwrap().clone();

  // the caller coerces raw form input before invoking add_row
  let mut values = IndexMap::new();
  values.insert(id_col.id.clone(), id_col.coerce_value("u1"));
  values.insert(age_col.id.clone(), age_col.coerce_value("29"));
  let row = store.add_row(&schema.id, values).unwrap().expect("row");
  assert_eq!(row.value(&age_col.id), Some(&CellValue::Number(29.0)));

  let mut update = IndexMap::new();
  update.insert(age_col.id.clone(), CellValue::Number(30.0));
  store.update_row(&schema.id, &row.id, update).unwrap();
  let table = store.get_table_by_id(&schema.id).unwrap().unwrap();
  assert_eq!(table.row_by_id(&row.id).unwrap().value(&age_col.id), Some(&CellValue::Number(30.0)));
  // the untouched column keeps its value
  assert_eq!(table.row_by_id(&row.id).unwrap().value(&id_col.id), Some(&CellValue::Text("u1".into())));

  store.delete_row(&schema.id, &row.id).unwrap();
  assert!(store.get_table_by_id(&schema.id).unwrap().unwrap().rows.is_empty());

  // unknown ids are silent no-ops
  store.update_row(&schema.id, "missing", IndexMap::new()).unwrap();
  store.delete_row("missing", "missing").unwrap();
  assert!(store.add_row("missing", IndexMap::new()).unwrap().is_none());
}

#[test]
fn failed_persistence_rolls_back_the_optimistic_update() {
  let (adapter, store) = store();
  let schema = store.create_table(users_schema()).unwrap();
  let tables_before = store.list_tables().unwrap();
  let persisted_before = adapter.persisted().unwrap();

  adapter.fail_next_save();
  let result = store.add_row(&schema.id, IndexMap::new());
  assert!(matches!(result, Err(DomainError::StorageError(_))));

  // in-memory state is unchanged, matching what a reload would see
  assert_eq!(store.list_tables().unwrap(), tables_before);
  assert_eq!(adapter.persisted().unwrap(), persisted_before);

  // the store keeps working after the failure
  assert!(store.add_row(&schema.id, IndexMap::new()).unwrap().is_some());
}

#[test]
fn load_failure_resets_to_empty_state() {
  struct FailingAdapter;
  impl StorageAdapter for FailingAdapter {
    fn load(&self) -> Result<table_domain::StoreSnapshot, DomainError> {
      Err(DomainError::StorageError("boom".into()))
    }
    fn save_all(&self,
                _: &[table_domain::TableData],
                _: &table_domain::DatabaseSchema)
                -> Result<(), DomainError> {
      Ok(())
    }
  }

  let store = TableStore::new(Arc::new(FailingAdapter));
  store.load().unwrap();
  assert!(store.list_tables().unwrap().is_empty());
  assert!(store.schema().unwrap().tables.is_empty());
}
