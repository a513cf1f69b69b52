//! Utility functions and traits for `ProbeMap`

use crate::{FromPairsError, ProbeMap};

/// Extension trait for `ProbeMap` that provides additional utility methods
pub trait ProbeMapExtensions {
    /// Returns the keys of the map in slot order
    fn keys(&self) -> Vec<u64>;

    /// Returns owned copies of the values of the map in slot order
    fn values(&self) -> Vec<String>;

    /// Returns owned copies of the pairs of the map, sorted by key
    fn sorted_pairs(&self) -> Vec<(u64, String)>;
}

impl ProbeMapExtensions for ProbeMap {
    fn keys(&self) -> Vec<u64> {
        self.iter().map(|(k, _)| k).collect()
    }

    fn values(&self) -> Vec<String> {
        self.iter().map(|(_, v)| v.to_owned()).collect()
    }

    fn sorted_pairs(&self) -> Vec<(u64, String)> {
        let mut pairs: Vec<(u64, String)> = self.iter().map(|(k, v)| (k, v.to_owned())).collect();
        pairs.sort_unstable_by_key(|(k, _)| *k);
        pairs
    }
}

/// Creates a `ProbeMap` with `capacity` slots from an iterator of key-value pairs.
///
/// A key that appears more than once keeps its last value.
///
/// # Errors
///
/// Fails if the map cannot be created or if the pairs hold more distinct keys than
/// `capacity`.
pub fn from_pairs<'a, I>(capacity: usize, iter: I) -> Result<ProbeMap, FromPairsError>
where
    I: IntoIterator<Item = (u64, &'a str)>,
{
    let mut map = ProbeMap::with_capacity(capacity)?;

    for (key, value) in iter {
        map.insert_or_assign(key, value)?;
    }

    Ok(map)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{CreateError, InsertError};

    #[test]
    fn test_from_pairs() {
        let data = vec![(1, "a"), (2, "b"), (3, "c"), (1, "z")];

        let map = from_pairs(8, data).unwrap();

        assert_eq!(map.find(1), Some("z"));
        assert_eq!(map.find(2), Some("b"));
        assert_eq!(map.find(3), Some("c"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_from_pairs_errors() {
        assert_eq!(
            from_pairs(0, [(1, "a")]).unwrap_err(),
            FromPairsError::Create(CreateError::InvalidCapacity)
        );
        assert_eq!(
            from_pairs(2, [(1, "a"), (2, "b"), (3, "c")]).unwrap_err(),
            FromPairsError::Insert(InsertError::Full { capacity: 2 })
        );
    }

    #[test]
    fn test_keys_and_values() {
        let mut map = ProbeMap::with_capacity(8).unwrap();
        map.insert(6, "c").unwrap();
        map.insert(1, "a").unwrap();
        map.insert(9, "b").unwrap(); // collides with 1 and lands in slot 2

        assert_eq!(map.keys(), vec![1, 9, 6]);
        assert_eq!(map.values(), vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(
            map.sorted_pairs(),
            vec![(1, "a".to_string()), (6, "c".to_string()), (9, "b".to_string())]
        );
    }
}
