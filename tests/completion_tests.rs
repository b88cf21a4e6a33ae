use std::collections::HashSet;

use quickcheck::{quickcheck, TestResult};
use typeahead::{PrefixIndex, TernaryTree, Tree};

// Folds arbitrary bytes onto a five letter alphabet so generated keys share
// prefixes often enough to force splits.
fn words(raw: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    raw.into_iter()
        .map(|word| word.into_iter().take(12).map(|b| b'a' + b % 5).collect())
        .collect()
}

fn build(keys: &[Vec<u8>]) -> Tree<usize> {
    let mut tree = Tree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.insert(key, i);
    }
    tree
}

fn set(keys: Vec<Vec<u8>>) -> HashSet<Vec<u8>> {
    keys.into_iter().collect()
}

fn strings(list: &[&str]) -> HashSet<Vec<u8>> {
    list.iter().map(|key| key.as_bytes().to_vec()).collect()
}

#[test]
fn test_mid_edge_query() {
    let mut tree = Tree::new();
    tree.insert("alexander", ());

    assert_eq!(tree.root().edges().len(), 1);
    assert_eq!(tree.complete("alex"), vec![b"alexander".to_vec()]);
    assert_eq!(set(tree.find("alex").into_keys().collect()), strings(&["alexander"]));
}

#[test]
fn test_branching() {
    let mut tree = Tree::new();
    tree.insert("john", ());
    tree.insert("jane", ());

    assert_eq!(set(tree.complete("j")), strings(&["john", "jane"]));

    let split = &tree.root().edges()[0];
    assert_eq!(split.label(), b"j");
    assert!(!split.is_terminal());
    assert_eq!(split.child().edges().len(), 2);
}

#[test]
fn test_no_match() {
    let mut tree = Tree::new();
    tree.insert("cat", ());
    tree.insert("car", ());

    assert!(tree.complete("dog").is_empty());
    assert!(tree.find("dog").is_empty());
    assert!(!tree.view("dog").exists());
}

#[test]
fn test_idempotent_insert() {
    let mut tree = Tree::new();
    tree.insert("paper", ());
    tree.insert("papers", ());
    let before = set(tree.complete("pap"));

    for _ in 0..4 {
        tree.insert("paper", ());
    }

    assert_eq!(set(tree.complete("pap")), before);
    assert_eq!(tree.len(), 2);
    // One insert of "papers" also passes through "paper"
    assert_eq!(tree.count("paper"), Some(6));

    let found = tree.find("paper");
    assert_eq!(found.len(), 2);
    assert!(found[&b"paper".to_vec()].is_terminal());
}

#[test]
fn test_dictionary_sample() {
    let words = [
        "alexas",
        "alexander",
        "alexanders",
        "alexandreid",
        "alexandra",
        "alexandrian",
        "alexandrianism",
        "alexandrine",
        "alexandrina",
        "alexandrite",
        "alexic",
        "alexia",
        "alexian",
        "alexin",
        "alexinic",
        "alexipyretic",
        "alexipharmic",
        "alexipharmical",
        "alexipharmacum",
        "alexipharmacon",
        "alexis",
        "alexiteric",
        "alexiterical",
        "alexius",
    ];
    let tree: Tree<()> = words.iter().map(|word| (word, ())).collect();

    assert_eq!(tree.len(), words.len());
    assert_eq!(tree.complete("alex").len(), words.len());
    assert_eq!(
        set(tree.complete("alexipharmac")),
        strings(&["alexipharmacum", "alexipharmacon"])
    );
    assert_eq!(
        set(tree.complete("alexandrin")),
        strings(&["alexandrine", "alexandrina"])
    );
    assert!(tree.root().check_invariants().is_ok());
    assert!(tree.edge_count() <= 2 * tree.len() - 1);
}

#[test]
fn test_view_and_tree_agree() {
    let tree: Tree<()> = ["hello", "help", "helpful", "world"]
        .iter()
        .map(|word| (word, ()))
        .collect();

    let view = tree.view("hel");
    assert_eq!(view.completions(), &tree.complete("hel")[..]);
    assert_eq!(view.len(), 3);
    assert!(view.contains_key("helpful"));
    assert!(!view.contains_key("world"));
}

#[test]
fn prop_round_trip_membership() {
    fn prop(raw: Vec<Vec<u8>>) -> bool {
        let keys = words(raw);
        let tree = build(&keys);

        keys.iter().filter(|key| !key.is_empty()).all(|key| {
            let found = tree.find(key);
            let exact = found.get(key).map_or(false, |edge| edge.is_terminal() && edge.count() >= 1);
            exact && tree.contains_key(key) && tree.complete(key).contains(key)
        })
    }
    quickcheck(prop as fn(Vec<Vec<u8>>) -> bool);
}

#[test]
fn prop_prefix_monotonicity() {
    fn prop(raw: Vec<Vec<u8>>) -> bool {
        let keys = words(raw);
        let tree = build(&keys);

        keys.iter().all(|key| {
            (1..key.len()).all(|i| {
                let shorter = set(tree.complete(&key[..i]));
                let longer = set(tree.complete(&key[..i + 1]));
                shorter.is_superset(&longer)
            })
        })
    }
    quickcheck(prop as fn(Vec<Vec<u8>>) -> bool);
}

#[test]
fn prop_find_and_complete_agree() {
    fn prop(raw: Vec<Vec<u8>>, probe: Vec<u8>) -> TestResult {
        let keys = words(raw);
        let probe: Vec<u8> = words(vec![probe]).remove(0).into_iter().take(3).collect();
        if probe.is_empty() {
            return TestResult::discard();
        }
        let tree = build(&keys);

        let found: HashSet<Vec<u8>> = tree.find(&probe).into_keys().collect();
        let completed = set(tree.complete(&probe));
        let expected: HashSet<Vec<u8>> = keys
            .iter()
            .filter(|key| key.starts_with(&probe))
            .cloned()
            .collect();

        TestResult::from_bool(found == completed && completed == expected)
    }
    quickcheck(prop as fn(Vec<Vec<u8>>, Vec<u8>) -> TestResult);
}

#[test]
fn prop_idempotence() {
    fn prop(raw: Vec<u8>, times: u8) -> TestResult {
        let key = words(vec![raw]).remove(0);
        if key.is_empty() {
            return TestResult::discard();
        }
        let times = usize::from(times % 8) + 1;

        let mut tree = Tree::new();
        for _ in 0..times {
            tree.insert(&key, ());
        }

        let completions = tree.complete(&key[..1]);
        TestResult::from_bool(
            tree.len() == 1 && tree.count(&key) == Some(times) && completions == vec![key],
        )
    }
    quickcheck(prop as fn(Vec<u8>, u8) -> TestResult);
}

#[test]
fn prop_structure_stays_valid() {
    fn prop(raw: Vec<Vec<u8>>) -> bool {
        let keys = words(raw);
        let tree = build(&keys);
        let distinct: HashSet<&Vec<u8>> = keys.iter().filter(|key| !key.is_empty()).collect();

        tree.root().check_invariants().is_ok()
            && tree.len() == distinct.len()
            && tree.iter().count() == distinct.len()
            && (tree.is_empty() || tree.edge_count() <= 2 * tree.len() - 1)
    }
    quickcheck(prop as fn(Vec<Vec<u8>>) -> bool);
}

#[test]
fn prop_half_key_finds_single_key() {
    fn prop(key: Vec<u8>) -> TestResult {
        if key.len() < 2 {
            return TestResult::discard();
        }
        let mut tree = Tree::new();
        tree.insert(&key, ());

        let found = tree.find(&key[..key.len() / 2]);
        TestResult::from_bool(found.len() == 1 && found.contains_key(&key))
    }
    quickcheck(prop as fn(Vec<u8>) -> TestResult);
}

#[test]
fn prop_backends_agree() {
    fn prop(raw: Vec<Vec<u8>>, probe: u8) -> bool {
        let keys = words(raw);
        let mut radix = Tree::new();
        let mut ternary = TernaryTree::new();
        for key in &keys {
            PrefixIndex::insert(&mut radix, key, ());
            PrefixIndex::insert(&mut ternary, key, ());
        }

        let prefix = [b'a' + probe % 5];
        PrefixIndex::len(&radix) == PrefixIndex::len(&ternary)
            && set(PrefixIndex::complete(&radix, &prefix)) == set(ternary.complete(&prefix))
    }
    quickcheck(prop as fn(Vec<Vec<u8>>, u8) -> bool);
}
