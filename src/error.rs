//! Error types reported by [`ProbeMap`](crate::ProbeMap) operations

use thiserror::Error;

/// Failure to construct a [`ProbeMap`](crate::ProbeMap)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    /// A map needs at least one slot
    #[error("capacity must be greater than zero")]
    InvalidCapacity,
    /// The slot array could not be allocated
    #[error("failed to allocate {capacity} slots")]
    AllocationFailure {
        /// Number of slots that was requested
        capacity: usize,
    },
}

/// Failure to insert a new key into a [`ProbeMap`](crate::ProbeMap)
///
/// Neither variant mutates the map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// Every slot is occupied
    #[error("map is full ({capacity} of {capacity} slots occupied)")]
    Full {
        /// Fixed capacity of the rejecting map
        capacity: usize,
    },
    /// The key is already present
    #[error("key {0} is already present")]
    DuplicateKey(u64),
}

/// Failure to build a [`ProbeMap`](crate::ProbeMap) from a sequence of pairs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FromPairsError {
    /// The map could not be created
    #[error(transparent)]
    Create(#[from] CreateError),
    /// A pair could not be stored
    #[error(transparent)]
    Insert(#[from] InsertError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CreateError::InvalidCapacity.to_string(), "capacity must be greater than zero");
        assert_eq!(
            CreateError::AllocationFailure { capacity: 8 }.to_string(),
            "failed to allocate 8 slots"
        );
        assert_eq!(
            InsertError::Full { capacity: 4 }.to_string(),
            "map is full (4 of 4 slots occupied)"
        );
        assert_eq!(InsertError::DuplicateKey(42).to_string(), "key 42 is already present");
        assert_eq!(
            FromPairsError::from(InsertError::Full { capacity: 2 }).to_string(),
            "map is full (2 of 2 slots occupied)"
        );
    }
}
