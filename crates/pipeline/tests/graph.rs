use pipeline::{is_reserved_tab, Connection, FlowNode, FlowTab, NodeColumn, NodePosition, PipelineError, TabManager};

fn storage(tab: &mut FlowTab, label: &str) -> String {
  tab.add_node(FlowNode::storage(label,
                                 NodePosition::new(0.0, 0.0),
                                 label,
                                 vec![NodeColumn::new("id", "string")]))
}

fn transform(tab: &mut FlowTab, label: &str) -> String {
  tab.add_node(FlowNode::transform(label,
                                   NodePosition::new(200.0, 0.0),
                                   vec![NodeColumn::new("out", "number")],
                                   "sum"))
}

fn misc(tab: &mut FlowTab, label: &str) -> String {
  tab.add_node(FlowNode::miscellaneous(label, NodePosition::new(400.0, 0.0)))
}

#[test]
fn storage_transform_pairs_are_valid_both_ways() {
  let mut tab = FlowTab::new("t");
  let s = storage(&mut tab, "users");
  let t = transform(&mut tab, "filter");
  let m = misc(&mut tab, "note");

  assert!(tab.is_valid_connection(&Connection::new(s.clone(), t.clone())));
  assert!(tab.is_valid_connection(&Connection::new(t.clone(), s.clone())));
  assert!(tab.is_valid_connection(&Connection::new(m.clone(), t.clone())));
  assert!(tab.is_valid_connection(&Connection::new(t.clone(), m.clone())));
}

#[test]
fn transform_to_transform_and_self_loops_are_rejected() {
  let mut tab = FlowTab::new("t");
  let t1 = transform(&mut tab, "t1");
  let t2 = transform(&mut tab, "t2");
  let s = storage(&mut tab, "users");

  assert!(!tab.is_valid_connection(&Connection::new(t1.clone(), t2.clone())));
  assert!(!tab.is_valid_connection(&Connection::new(t1.clone(), t1.clone())));
  assert!(!tab.is_valid_connection(&Connection::new(s.clone(), s.clone())));
  // storage -> storage is also illegal
  let s2 = storage(&mut tab, "orders");
  assert!(!tab.is_valid_connection(&Connection::new(s, s2)));
}

#[test]
fn handle_roles_must_resolve_to_output_and_input() {
  let mut tab = FlowTab::new("t");
  let s = storage(&mut tab, "users");
  let t = transform(&mut tab, "filter");

  // canonical handles by default
  assert!(tab.is_valid_connection(&Connection::new(s.clone(), t.clone())));
  // explicit canonical handles
  assert!(tab.is_valid_connection(&Connection::new(s.clone(), t.clone()).with_handles("output", "input")));
  // swapped roles are rejected
  assert!(!tab.is_valid_connection(&Connection::new(s.clone(), t.clone()).with_handles("input", "output")));
}

#[test]
fn rejected_connection_does_not_mutate_edges() {
  let mut tab = FlowTab::new("t");
  let t1 = transform(&mut tab, "t1");
  let t2 = transform(&mut tab, "t2");

  let result = tab.connect(Connection::new(t1, t2));
  assert!(matches!(result, Err(PipelineError::InvalidConnection(_))));
  assert!(tab.edges.is_empty());
}

#[test]
fn removing_a_node_removes_every_referencing_edge() {
  let mut tab = FlowTab::new("t");
  let s1 = storage(&mut tab, "users");
  let s2 = storage(&mut tab, "orders");
  let t = transform(&mut tab, "join");

  tab.connect(Connection::new(s1.clone(), t.clone())).unwrap();
  tab.connect(Connection::new(s2.clone(), t.clone())).unwrap();
  tab.connect(Connection::new(t.clone(), s2.clone())).unwrap();
  assert_eq!(tab.edges.len(), 3);

  tab.remove_node(&t);
  assert!(tab.node_by_id(&t).is_none());
  assert!(tab.edges.is_empty());
  // unrelated nodes survive
  assert!(tab.node_by_id(&s1).is_some());
}

#[test]
fn connect_marks_edge_animated() {
  let mut tab = FlowTab::new("t");
  let s = storage(&mut tab, "users");
  let t = transform(&mut tab, "filter");
  let edge_id = tab.connect(Connection::new(s, t)).unwrap();
  assert!(tab.edge_by_id(&edge_id).unwrap().animated);
}

#[test]
fn incoming_storage_nodes_feed_codegen() {
  let mut tab = FlowTab::new("t");
  let s1 = storage(&mut tab, "users");
  let s2 = storage(&mut tab, "orders");
  let m = misc(&mut tab, "note");
  let t = transform(&mut tab, "join");

  tab.connect(Connection::new(s1, t.clone())).unwrap();
  tab.connect(Connection::new(s2, t.clone())).unwrap();
  tab.connect(Connection::new(m, t.clone())).unwrap();

  let inputs = tab.incoming_storage_nodes(&t);
  let mut names: Vec<&str> = inputs.iter()
                                   .map(|n| n.data.label.as_str())
                                   .collect();
  names.sort();
  assert_eq!(names, vec!["orders", "users"]);
}

#[test]
fn reserved_tabs_are_excluded_from_crud() {
  let mut tabs = TabManager::new();
  assert!(is_reserved_tab("tables"));
  assert!(is_reserved_tab("schema"));
  assert!(is_reserved_tab("import-export"));

  assert!(matches!(tabs.rename_tab("tables", "x"), Err(PipelineError::ReservedTab(_))));
  assert!(matches!(tabs.delete_tab("import-export"), Err(PipelineError::ReservedTab(_))));
}

#[test]
fn tab_crud_and_active_switching() {
  let mut tabs = TabManager::new();
  let first = tabs.active_tab_id().to_string();
  let second = tabs.create_tab("Flow 2");

  // creating does not activate
  assert_eq!(tabs.active_tab_id(), first);
  assert!(tabs.set_active(&second).unwrap());
  // switching to the already-active tab reports no change
  assert!(!tabs.set_active(&second).unwrap());

  tabs.rename_tab(&second, "Renamed").unwrap();
  assert_eq!(tabs.tab_by_id(&second).unwrap().name, "Renamed");

  // deleting the active tab falls back to the first remaining one
  tabs.delete_tab(&second).unwrap();
  assert_eq!(tabs.active_tab_id(), first);
  // the last ordinary tab cannot be deleted
  assert!(tabs.delete_tab(&first).is_err());
}
