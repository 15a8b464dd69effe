//! Hash collections using AHash.

pub use ahash::RandomState;

/// Insertion-ordered map keyed with AHash.
///
/// Iteration order matches insertion order, which keeps series draw order
/// stable from frame to frame.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_map_keeps_insertion_order() {
        let mut map = IndexMap::default();
        map.insert(3u32, "c");
        map.insert(1u32, "a");
        map.insert(2u32, "b");
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn test_shift_remove_keeps_order() {
        let mut map: IndexMap<u32, &str> = IndexMap::default();
        for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
            map.insert(key, value);
        }
        map.shift_remove(&2);
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 3]);
    }
}
