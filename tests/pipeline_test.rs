//! End-to-end pipeline tests
//!
//! Each test writes stub fixtures into its own temp directory, runs the
//! full ingest (walk, parse, build, persist) and inspects the resulting
//! graph. Folder paths deliberately contain the `CDPL` marker component
//! so logical folder naming is exercised too.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use stubgraph::graph::{GraphStore, NodeKey, NodeLabel, RelKind};
use stubgraph::models::Corpus;
use stubgraph::pipeline::Pipeline;

const MOLECULE_STUB: &str = r#"##
# \brief Container of atoms and bonds.
#
class Molecule(Base.Entity):

    ##
    # \brief A single atom.
    #
    class Atom(): pass

    ##
    # \brief Retrieves an atom by index.
    # \param idx Zero-based index.
    # \return The atom.
    #
    def getAtom(idx: int) -> Atom: pass

    numAtoms = property(getNumAtoms)
"#;

const FUNCTIONS_STUB: &str = r#"##
# \brief Parses a SMILES string.
# \param smiles The input string.
# \return A new molecule.
#
def parseSmiles(smiles: str) -> Chem.Molecule: pass

##
# \brief Writes a molecule.
# \param mol The molecule.
#
def writeMolecule(mol: Chem.Molecule, fmt: str = 'smi') -> None: pass
"#;

/// Temp workspace with one stub folder under a CDPL marker component.
fn workspace(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let folder = dir.path().join("Source").join("CDPL").join("Chem");
    fs::create_dir_all(&folder).expect("create folder");
    for (name, content) in files {
        fs::write(folder.join(name), content).expect("write stub");
    }
    (dir, folder)
}

fn pipeline(dir: &TempDir) -> Pipeline {
    let store = GraphStore::open(&dir.path().join(".stubgraph")).expect("open store");
    Pipeline::new(store, "CDPKit")
}

#[test]
fn full_ingest_builds_the_expected_graph() {
    let (dir, folder) = workspace(&[
        ("Molecule.doc.py", MOLECULE_STUB),
        ("Functions.doc.py", FUNCTIONS_STUB),
    ]);
    let pipeline = pipeline(&dir);

    let stats = pipeline.ingest(&[folder]).expect("ingest");
    assert_eq!(stats.folders, 1);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.unparseable, 0);
    assert_eq!(stats.classes, 1);
    assert_eq!(stats.functions, 2);

    let store = pipeline.store();
    assert!(store.contains(&NodeKey::named(NodeLabel::Project, "CDPKit")));
    // Logical folder name comes from the component after the marker.
    assert!(store.contains(&NodeKey::named(NodeLabel::Folder, "Chem")));
    assert!(store.contains(&NodeKey::named(NodeLabel::File, "Molecule.doc.py")));
    let molecule = store
        .get_node(&NodeKey::named(NodeLabel::Class, "Molecule"))
        .expect("Molecule node");
    assert_eq!(
        molecule.get_str("comment"),
        Some("Container of atoms and bonds.")
    );

    // Inheritance target is the last dotted segment, created on demand.
    assert!(store.contains(&NodeKey::named(NodeLabel::Class, "Entity")));
    assert_eq!(store.relationships_of(RelKind::InheritsFrom).len(), 1);

    // Both return annotations resolve to existing or on-demand classes;
    // the dotted Chem.Molecule parameter type lands on Molecule.
    let of_type = store.relationships_of(RelKind::OfType);
    assert!(of_type
        .iter()
        .any(|(_, target)| target == &NodeKey::named(NodeLabel::Class, "Molecule").id()));
    assert!(store.contains(&NodeKey::named(NodeLabel::Class, "str")));
}

#[test]
fn nested_class_hangs_off_its_parent() {
    let (dir, folder) = workspace(&[("Molecule.doc.py", MOLECULE_STUB)]);
    let pipeline = pipeline(&dir);
    pipeline.ingest(&[folder]).expect("ingest");
    let store = pipeline.store();

    assert!(store.contains(&NodeKey::named(NodeLabel::Class, "Atom")));
    let has = store.relationships_of(RelKind::Has);
    let outer = NodeKey::named(NodeLabel::Class, "Molecule").id();
    let inner = NodeKey::named(NodeLabel::Class, "Atom").id();
    assert!(has.contains(&(outer, inner)));
}

#[test]
fn reingesting_the_same_stubs_is_a_noop() {
    let (dir, folder) = workspace(&[
        ("Molecule.doc.py", MOLECULE_STUB),
        ("Functions.doc.py", FUNCTIONS_STUB),
    ]);
    let pipeline = pipeline(&dir);

    pipeline.ingest(std::slice::from_ref(&folder)).expect("first ingest");
    let nodes = pipeline.store().node_count();
    let edges = pipeline.store().edge_count();

    pipeline.ingest(&[folder]).expect("second ingest");
    assert_eq!(pipeline.store().node_count(), nodes);
    assert_eq!(pipeline.store().edge_count(), edges);
}

#[test]
fn graph_survives_reopening_the_database() {
    let (dir, folder) = workspace(&[("Functions.doc.py", FUNCTIONS_STUB)]);
    let db_dir = dir.path().join(".stubgraph");

    let nodes;
    let edges;
    {
        let store = GraphStore::open(&db_dir).expect("open store");
        let pipeline = Pipeline::new(store, "CDPKit");
        pipeline.ingest(&[folder]).expect("ingest");
        nodes = pipeline.store().node_count();
        edges = pipeline.store().edge_count();
    }

    let reopened = GraphStore::open(&db_dir).expect("reopen store");
    assert_eq!(reopened.node_count(), nodes);
    assert_eq!(reopened.edge_count(), edges);
    assert!(reopened.contains(&NodeKey::named(NodeLabel::Folder, "Chem")));
}

#[test]
fn broken_stub_is_skipped_and_counted() {
    let (dir, folder) = workspace(&[
        ("Good.doc.py", "def f() -> None: pass\n"),
        ("Broken.doc.py", "class ((((:\n"),
    ]);
    let pipeline = pipeline(&dir);

    let stats = pipeline.ingest(&[folder]).expect("ingest");
    assert_eq!(stats.files, 2);
    assert_eq!(stats.unparseable, 1);
    assert_eq!(stats.functions, 1);
}

#[test]
fn reserved_parameter_name_is_repaired_to_stream() {
    let (dir, folder) = workspace(&[(
        "Io.doc.py",
        "##\n# \\brief Reads a record.\n# \\param is The input stream.\n#\ndef read(is: Base.IOStream) -> bool: pass\n",
    )]);
    let pipeline = pipeline(&dir);

    let stats = pipeline.ingest(&[folder]).expect("ingest");
    assert_eq!(stats.unparseable, 0);
    assert_eq!(stats.functions, 1);

    let store = pipeline.store();
    let params = store.nodes_by_label(NodeLabel::Parameter);
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name(), "stream");
}

#[test]
fn empty_folder_still_creates_the_folder_node() {
    let dir = TempDir::new().expect("temp dir");
    let folder = dir.path().join("Source").join("CDPL").join("Empty");
    fs::create_dir_all(&folder).expect("create folder");
    let pipeline = pipeline(&dir);

    let stats = pipeline.ingest(&[folder]).expect("ingest");
    assert_eq!(stats.files, 0);
    assert!(pipeline
        .store()
        .contains(&NodeKey::named(NodeLabel::Folder, "Empty")));
}

#[test]
fn multiple_folders_share_one_project() {
    let dir = TempDir::new().expect("temp dir");
    let chem = dir.path().join("CDPL").join("Chem");
    let math = dir.path().join("CDPL").join("Math");
    fs::create_dir_all(&chem).unwrap();
    fs::create_dir_all(&math).unwrap();
    fs::write(chem.join("A.doc.py"), "class A(): pass\n").unwrap();
    fs::write(math.join("B.doc.py"), "class B(): pass\n").unwrap();

    let pipeline = pipeline(&dir);
    let stats = pipeline.ingest(&[chem, math]).expect("ingest");
    assert_eq!(stats.folders, 2);

    let store = pipeline.store();
    assert_eq!(store.nodes_by_label(NodeLabel::Project).len(), 1);
    // Both folders hang off the single project node.
    let project_id = NodeKey::named(NodeLabel::Project, "CDPKit").id();
    let included = store.relationships_of(RelKind::IncludedIn);
    assert_eq!(
        included.iter().filter(|(_, to)| to == &project_id).count(),
        2
    );
}

#[test]
fn corpus_can_accumulate_folders_before_one_build() {
    let dir = TempDir::new().expect("temp dir");
    let chem = dir.path().join("CDPL").join("Chem");
    fs::create_dir_all(&chem).unwrap();
    fs::write(chem.join("A.doc.py"), "def f() -> None: pass\n").unwrap();

    let pipeline = pipeline(&dir);
    let mut corpus = Corpus::default();
    pipeline.ingest_folder(&mut corpus, &chem);
    pipeline.build_graph(&corpus).expect("build");

    assert_eq!(pipeline.store().nodes_by_label(NodeLabel::Function).len(), 1);
}
