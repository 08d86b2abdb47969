use rustc_hash::FxHashSet;

pub type HashSet<K> = FxHashSet<K>;

/// Ordered `(source, target)` pair identifying a connection.
pub type EdgeKey = (usize, usize);
