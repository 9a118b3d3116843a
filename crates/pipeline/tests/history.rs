use pipeline::{FlowNode, FlowTab, HistoryTracker, NodePosition, HISTORY_CAP};

fn node(label: &str, x: f64) -> FlowNode {
  FlowNode::storage(label, NodePosition::new(x, 0.0), label, vec![])
}

fn tab_with(labels: &[&str]) -> FlowTab {
  let mut tab = FlowTab::new("t");
  for (i, l) in labels.iter().enumerate() {
    tab.add_node(node(l, i as f64 * 100.0));
  }
  tab
}

#[test]
fn undo_redo_walk_linear_history() {
  let mut history = HistoryTracker::new();
  let a = tab_with(&["a"]);
  let b = tab_with(&["a", "b"]);

  history.save_state(&a.nodes, &a.edges).unwrap();
  history.save_state(&b.nodes, &b.edges).unwrap();

  // undo lands on A
  let snap = history.undo().expect("undo");
  history.end_replay();
  assert_eq!(snap.nodes.len(), 1);
  assert_eq!(history.current_state().nodes.len(), 1);

  // redo lands back on B
  let snap = history.redo().expect("redo");
  history.end_replay();
  assert_eq!(snap.nodes.len(), 2);
  assert_eq!(history.current_state().nodes.len(), 2);
}

#[test]
fn new_snapshot_after_undo_discards_redo_branch() {
  let mut history = HistoryTracker::new();
  let a = tab_with(&["a"]);
  let b = tab_with(&["a", "b"]);
  let c = tab_with(&["a", "c", "c2"]);

  history.save_state(&a.nodes, &a.edges).unwrap();
  history.save_state(&b.nodes, &b.edges).unwrap();
  history.undo().expect("undo");
  history.end_replay();

  // divergent mutation: the B branch is gone
  history.save_state(&c.nodes, &c.edges).unwrap();
  assert!(history.redo().is_none());
  assert_eq!(history.current_state().nodes.len(), 3);
}

#[test]
fn undo_at_oldest_entry_is_noop() {
  let mut history = HistoryTracker::new();
  assert!(history.undo().is_none());
  assert!(!history.can_undo());
}

#[test]
fn saves_while_replaying_are_suppressed() {
  let mut history = HistoryTracker::new();
  let a = tab_with(&["a"]);
  let b = tab_with(&["a", "b"]);
  history.save_state(&a.nodes, &a.edges).unwrap();
  history.save_state(&b.nodes, &b.edges).unwrap();

  let len_before = history.len();
  let snap = history.undo().expect("undo");
  // applying the replayed state notifies back into save_state; it must
  // not push the replayed state onto the log
  history.save_state(&snap.nodes, &snap.edges).unwrap();
  history.end_replay();
  assert_eq!(history.len(), len_before);
  assert_eq!(history.current_state().nodes.len(), 1);
}

#[test]
fn identical_consecutive_snapshot_is_deduplicated() {
  let mut history = HistoryTracker::new();
  let a = tab_with(&["a"]);
  history.save_state(&a.nodes, &a.edges).unwrap();
  let len = history.len();
  history.save_state(&a.nodes, &a.edges).unwrap();
  assert_eq!(history.len(), len);
}

#[test]
fn log_is_capped_at_fifty_with_cursor_on_latest() {
  let mut history = HistoryTracker::new();
  for i in 0..60 {
    let label = format!("n{}", i);
    let tab = tab_with(&[label.as_str()]);
    history.save_state(&tab.nodes, &tab.edges).unwrap();
  }
  assert_eq!(history.len(), HISTORY_CAP);
  assert_eq!(history.cursor(), HISTORY_CAP - 1);
  assert_eq!(history.current_state().nodes[0].data.label, "n59");
}

#[test]
fn clear_history_resets_to_single_empty_snapshot() {
  let mut history = HistoryTracker::new();
  let a = tab_with(&["a"]);
  history.save_state(&a.nodes, &a.edges).unwrap();
  history.clear_history();
  assert_eq!(history.len(), 1);
  assert_eq!(history.cursor(), 0);
  assert!(history.current_state().nodes.is_empty());
  assert!(!history.can_undo());
  assert!(!history.can_redo());
}

#[test]
fn interaction_bracket_coalesces_into_one_entry() {
  let mut history = HistoryTracker::new();
  let base = tab_with(&["a"]);
  history.save_state(&base.nodes, &base.edges).unwrap();
  let len = history.len();

  // a drag: many intermediate position updates, one settled state
  history.begin_interaction();
  for x in 1..=10 {
    let mut tab = base.clone();
    tab.nodes[0].position.x = x as f64;
    history.save_state(&tab.nodes, &tab.edges).unwrap();
  }
  assert_eq!(history.len(), len);
  history.end_interaction().unwrap();
  assert_eq!(history.len(), len + 1);
  assert_eq!(history.current_state().nodes[0].position.x, 10.0);
}
