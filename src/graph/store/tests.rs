use super::*;

fn class_key(name: &str) -> NodeKey {
    NodeKey::named(NodeLabel::Class, name)
}

#[test]
fn merge_node_is_idempotent() {
    let store = GraphStore::in_memory();

    assert!(store.merge_node(&class_key("Atom")).unwrap());
    assert!(!store.merge_node(&class_key("Atom")).unwrap());
    assert_eq!(store.node_count(), 1);
}

#[test]
fn merge_relationship_deduplicates_by_triple() {
    let store = GraphStore::in_memory();
    store.merge_node(&class_key("Child")).unwrap();
    store.merge_node(&class_key("Parent")).unwrap();

    assert!(store
        .merge_relationship(&class_key("Child"), RelKind::InheritsFrom, &class_key("Parent"))
        .unwrap());
    assert!(!store
        .merge_relationship(&class_key("Child"), RelKind::InheritsFrom, &class_key("Parent"))
        .unwrap());
    // A different kind between the same endpoints is a different edge.
    assert!(store
        .merge_relationship(&class_key("Child"), RelKind::Has, &class_key("Parent"))
        .unwrap());

    assert_eq!(store.edge_count(), 2);
}

#[test]
fn merge_relationship_with_missing_endpoint_is_a_noop() {
    let store = GraphStore::in_memory();
    store.merge_node(&class_key("Atom")).unwrap();

    let created = store
        .merge_relationship(&class_key("Atom"), RelKind::OfType, &class_key("Ghost"))
        .unwrap();
    assert!(!created);
    assert_eq!(store.edge_count(), 0);
}

#[test]
fn set_properties_enriches_without_duplicating() {
    let store = GraphStore::in_memory();

    // Node first created bare, e.g. via an inheritance reference.
    store.merge_node(&class_key("Molecule")).unwrap();
    store
        .set_properties(&class_key("Molecule"), &[("comment", "A molecule.".into())])
        .unwrap();
    // Re-merging after enrichment is still a no-op.
    assert!(!store.merge_node(&class_key("Molecule")).unwrap());

    let node = store.get_node(&class_key("Molecule")).unwrap();
    assert_eq!(node.get_str("comment"), Some("A molecule."));
    assert_eq!(store.node_count(), 1);
}

#[test]
fn set_properties_on_missing_node_is_a_noop() {
    let store = GraphStore::in_memory();
    let updated = store
        .set_properties(&class_key("Ghost"), &[("comment", "x".into())])
        .unwrap();
    assert!(!updated);
}

#[test]
fn function_identity_includes_the_full_tuple() {
    let store = GraphStore::in_memory();

    let a = NodeKey::named(NodeLabel::Function, "f").with("parameter", "[]");
    let b = NodeKey::named(NodeLabel::Function, "f").with("parameter", "[{\"name\":\"x\"}]");

    store.merge_node(&a).unwrap();
    store.merge_node(&b).unwrap();
    assert_eq!(store.node_count(), 2);
}

#[test]
fn clear_wipes_nodes_and_relationships() {
    let store = GraphStore::in_memory();
    store.merge_node(&class_key("A")).unwrap();
    store.merge_node(&class_key("B")).unwrap();
    store
        .merge_relationship(&class_key("A"), RelKind::Has, &class_key("B"))
        .unwrap();

    store.clear().unwrap();
    assert_eq!(store.node_count(), 0);
    assert_eq!(store.edge_count(), 0);
}

#[test]
fn stats_counts_per_label() {
    let store = GraphStore::in_memory();
    store.merge_node(&class_key("A")).unwrap();
    store.merge_node(&class_key("B")).unwrap();
    store
        .merge_node(&NodeKey::named(NodeLabel::File, "a.doc.py"))
        .unwrap();

    let stats = store.stats();
    assert_eq!(stats.get("Class"), Some(&2));
    assert_eq!(stats.get("File"), Some(&1));
    assert_eq!(stats.get("total_nodes"), Some(&3));
}

#[test]
fn persisted_graph_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = GraphStore::open(dir.path()).unwrap();
        store.merge_node(&class_key("Atom")).unwrap();
        store.merge_node(&class_key("Entity")).unwrap();
        store
            .merge_relationship(&class_key("Atom"), RelKind::InheritsFrom, &class_key("Entity"))
            .unwrap();
        store
            .set_properties(&class_key("Atom"), &[("comment", "An atom.".into())])
            .unwrap();
        store.save().unwrap();
    }

    let reopened = GraphStore::open(dir.path()).unwrap();
    assert_eq!(reopened.node_count(), 2);
    assert_eq!(reopened.edge_count(), 1);
    assert_eq!(
        reopened
            .get_node(&class_key("Atom"))
            .unwrap()
            .get_str("comment"),
        Some("An atom.")
    );

    // Merging the same entities into the reloaded graph is a no-op.
    assert!(!reopened.merge_node(&class_key("Atom")).unwrap());
    assert!(!reopened
        .merge_relationship(&class_key("Atom"), RelKind::InheritsFrom, &class_key("Entity"))
        .unwrap());
}
