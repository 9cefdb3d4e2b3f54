//! Provider and action ids compare without regard to letter case, including
//! non-ASCII letters.

/// Case-folded form of an id, usable as a map key or sort key.
pub fn id_key(id: &str) -> String {
    id.to_lowercase()
}

pub fn same_id(a: &str, b: &str) -> bool {
    a == b || id_key(a) == id_key(b)
}
