use phylogen::characters::CharacterModel;
use phylogen::model::Tree;
use phylogen::newick::{NewickStyle, escape_label, to_newick, to_newick_with, to_sorted_newick, write_newick_file};
use phylogen::nexus::{NexusWriter, to_nexus};
use phylogen::rng::Seed;
use phylogen::simulation::TreeGeneratorBuilder;
use phylogen::wordlist::to_wordlist;
use std::fs;

/// ((C:1,B:2):0.5,A:1.5) with states on the leaves
fn tree_with_states() -> Tree {
    let mut tree = Tree::new();
    let root = tree.root_index();
    let inner = tree.add_child(root);
    tree[inner].set_branch_length(0.5);
    let c = tree.add_named_child(inner, "C", 1.0);
    let b = tree.add_named_child(inner, "B", 2.0);
    let a = tree.add_named_child(root, "A", 1.5);
    tree[a].set_states(vec![0, 1]);
    tree[b].set_states(vec![0, 3]);
    tree[c].set_states(vec![2, 1]);
    tree
}

// --- NEWICK ---
#[test]
fn test_newick() {
    let tree = tree_with_states();
    assert_eq!(to_newick(&tree), "((C:1,B:2):0.5,A:1.5);");
    assert_eq!(to_sorted_newick(&tree), "(A:1.5,(B:2,C:1):0.5);");
    assert_eq!(
        to_newick_with(&tree, NewickStyle::OneIndexed, false),
        "((3:1,2:2):0.5,1:1.5);"
    );
}

#[test]
fn test_sorted_newick_ignores_child_order() {
    let mut first = Tree::new();
    let root = first.root_index();
    first.add_named_child(root, "X", 1.0);
    first.add_named_child(root, "Y", 1.0);

    let mut second = Tree::new();
    let root = second.root_index();
    second.add_named_child(root, "Y", 1.0);
    second.add_named_child(root, "X", 1.0);

    assert_ne!(to_newick(&first), to_newick(&second));
    assert_eq!(to_sorted_newick(&first), to_sorted_newick(&second));
}

#[test]
fn test_label_escaping() {
    assert_eq!(escape_label("Kiwi"), "Kiwi");
    assert_eq!(escape_label("Tapphis moccus"), "Tapphis_moccus");
    assert_eq!(escape_label("A:B"), "'A:B'");
    assert_eq!(escape_label("O'Brien"), "'O''Brien'");
}

#[test]
fn test_generated_newick_is_balanced() {
    let tree = TreeGeneratorBuilder::new(1.0, 0.5)
        .with_min_leaves(20)
        .with_seed("newick")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    let newick = to_newick(&tree);
    assert!(newick.ends_with(';'));
    assert_eq!(newick.matches('(').count(), newick.matches(')').count());
    assert_eq!(newick.matches('(').count(), tree.num_internal());
    for leaf in tree.leaves() {
        assert!(newick.contains(tree[leaf].name().unwrap()));
    }
}

#[test]
fn test_write_newick_file() {
    let path = std::env::temp_dir().join("phylogen_test_write_newick_file.nwk");
    let trees = vec![tree_with_states(), tree_with_states()];
    write_newick_file(&path, &trees, true).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);
    assert_eq!(content, "(A:1.5,(B:2,C:1):0.5);\n(A:1.5,(B:2,C:1):0.5);\n");
}

// --- NEXUS ---
#[test]
fn test_nexus_layout() {
    let nexus = to_nexus(&tree_with_states()).unwrap();
    let expected = "\
#NEXUS

begin data;
  dimensions ntax=3 nchar=4;
  format datatype=standard missing=? gap=-;
  matrix
A    1010
B    1001
C    0110
  ;
end;

begin trees;
  translate
    1 A,
    2 B,
    3 C
  ;
  tree sim = ((3:1,2:2):0.5,1:1.5);
end;
";
    assert_eq!(nexus, expected);
}

#[test]
fn test_nexus_without_characters_warns() {
    let mut tree = Tree::new();
    let root = tree.root_index();
    tree.add_named_child(root, "Long name", 1.0);
    tree.add_named_child(root, "B", 1.0);

    let nexus = to_nexus(&tree).unwrap();
    assert!(nexus.starts_with("#NEXUS\n\n[WARNING: characters missing from tree]\n\nbegin data;\n"));
    assert!(nexus.contains("dimensions ntax=2 nchar=0;"));
    // Names padded to the longest name plus three, then a separator
    assert!(nexus.contains(&format!("\n{:<12} \n", "B")));
    assert!(nexus.contains(&format!("\n{:<12} \n", "Long_name")));
    assert!(nexus.contains("    1 B,\n    2 Long_name\n"));
}

#[test]
fn test_nexus_writer_into_inner() {
    let mut writer = NexusWriter::new(Vec::new());
    writer.write_nexus(&tree_with_states()).unwrap();
    let bytes = writer.into_inner().unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), to_nexus(&tree_with_states()).unwrap());
}

#[test]
fn test_nexus_writer_create() {
    let path = std::env::temp_dir().join("phylogen_test_nexus_writer_create.nex");
    let mut writer = NexusWriter::create(&path).unwrap();
    writer.write_nexus(&tree_with_states()).unwrap();
    drop(writer.into_inner().unwrap());

    let content = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);
    assert_eq!(content, to_nexus(&tree_with_states()).unwrap());
}

#[test]
fn test_nexus_of_simulated_tree() {
    let mut tree = TreeGeneratorBuilder::new(1.0, 0.5)
        .with_min_leaves(10)
        .with_pruning()
        .with_seed("nexus")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    CharacterModel::new(15, 2.0, 1.0)
        .evolve(&mut tree, Some(&Seed::from("nexus")))
        .unwrap();

    let nexus = to_nexus(&tree).unwrap();
    assert!(!nexus.contains("WARNING"));
    assert!(nexus.contains(&format!("dimensions ntax={} ", tree.num_leaves())));
    let rows: Vec<&str> = nexus
        .lines()
        .skip_while(|line| *line != "  matrix")
        .skip(1)
        .take_while(|line| *line != "  ;")
        .collect();
    assert_eq!(rows.len(), tree.num_leaves());
    let width = rows[0].split_whitespace().last().unwrap().len();
    assert!(width >= 15);
    for row in rows {
        let bits = row.split_whitespace().last().unwrap();
        assert_eq!(bits.len(), width);
        // Exactly one state present per character
        assert_eq!(bits.matches('1').count(), 15);
    }
}

// --- WORDLIST ---
#[test]
fn test_wordlist() {
    let wordlist = to_wordlist(&tree_with_states());
    let expected = "\
Language_ID,Feature_ID,Value
A,feature_0,0
B,feature_0,0
C,feature_0,2
A,feature_1,1
B,feature_1,3
C,feature_1,1
";
    assert_eq!(wordlist, expected);
}
