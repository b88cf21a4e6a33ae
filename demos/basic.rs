//! Examples of using the autocomplete tree
use typeahead::{dictionary, TernaryTree, Tree};

fn main() {
    // Build a tree from a small word list
    let mut tree = Tree::new();
    let stats = dictionary::load(
        "John\nJane\nJanet\nalexander\nalexandra\nalps\njohn\n".as_bytes(),
        &mut tree,
    )
    .expect("in-memory word list");
    println!("loaded {} words into {} edges", stats.words, tree.edge_count());
    print!("{}", tree);

    // Depth-first completion; "alex" stops inside a compressed edge
    for key in tree.complete("alex") {
        println!("complete: {}", String::from_utf8_lossy(&key));
    }

    // Breadth-first search reports the edge that ends each key
    for (key, edge) in tree.find("ja") {
        println!("find: {} (count {})", String::from_utf8_lossy(&key), edge.count());
    }

    // Ranked by how often each key was inserted
    for (key, count) in tree.suggest("j", 2) {
        println!("suggest: {} ({})", String::from_utf8_lossy(&key), count);
    }

    // The ternary backend answers the same query in sorted order
    let mut ternary = TernaryTree::new();
    dictionary::load("alexander\nalexandra\nalps\n".as_bytes(), &mut ternary)
        .expect("in-memory word list");
    assert_eq!(ternary.complete(b"alex").len(), 2);
}
