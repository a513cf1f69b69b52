//! # Probe Map
//!
//! A fixed-capacity hash table mapping `u64` keys to owned strings, using open addressing
//! with linear probing.
//!
//! Each key has a home slot, `key % capacity`. Collisions are resolved by scanning forward
//! one slot at a time and wrapping at the end of the table. Removal leaves a tombstone so
//! that keys placed further along the same probe run remain reachable, and inserts reuse
//! those tombstones.
//!
//! The capacity is chosen once at creation and never changes: a full map rejects new keys
//! instead of growing.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probemap::{InsertError, ProbeMap};
//!
//! // Create a map with four slots
//! let mut map = ProbeMap::with_capacity(4).unwrap();
//!
//! // Insert values, the map keeps its own copies
//! map.insert(1, "apple").unwrap();
//! map.insert(5, "banana").unwrap(); // same home slot as 1
//!
//! // Retrieve values
//! assert_eq!(map.find(5), Some("banana"));
//!
//! // Keys are unique
//! assert_eq!(map.insert(1, "cherry"), Err(InsertError::DuplicateKey(1)));
//!
//! // Update values
//! assert_eq!(map.insert_or_assign(1, "cherry"), Ok(Some("apple".to_string())));
//!
//! // Remove values, 5 stays reachable past the removed slot
//! assert_eq!(map.remove(1), Some("cherry".to_string()));
//! assert_eq!(map.find(5), Some("banana"));
//! ```
//!
//! ## Traversal
//!
//! Pairs come out in slot order, which is neither insertion order nor key order.
//!
//! ```rust
//! use probemap::ProbeMap;
//!
//! let mut map = ProbeMap::with_capacity(8).unwrap();
//! map.insert(7, "seven").unwrap();
//! map.insert(2, "two").unwrap();
//!
//! let keys: Vec<u64> = map.iter().map(|(key, _)| key).collect();
//! assert_eq!(keys, vec![2, 7]);
//!
//! let last = map.last().unwrap();
//! assert_eq!(map.pair(last), Some((7, "seven")));
//! ```

/// Error types for map construction and insertion
mod error;
/// Module implementing the fixed-capacity linear probing map
mod probe_map;
/// Utility functions and traits for the map
mod utils;

pub use error::{CreateError, FromPairsError, InsertError};
pub use probe_map::{DEFAULT_CAPACITY, Iter, ProbeMap, SlotIndex};
pub use utils::{ProbeMapExtensions, from_pairs};
