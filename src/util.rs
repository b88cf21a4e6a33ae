/// Returns the length of the longest common prefix of two byte sequences.
///
/// Both inputs are compared up to the length of the shorter one.
pub fn shared_prefix(a: &[u8], b: &[u8]) -> usize {
    let mut i = 0;

    while i < a.len() && i < b.len() && a[i] == b[i] {
        i += 1;
    }

    i
}

/// Returns `true` if either sequence is a prefix of the other.
///
/// This is the test used during descent: a query remainder may either
/// consume an edge label entirely or stop somewhere inside it.
pub fn overlaps(a: &[u8], b: &[u8]) -> bool {
    shared_prefix(a, b) == a.len().min(b.len())
}
