use std::{iter::FusedIterator, mem};

use log::{debug, trace};

use crate::error::{CreateError, InsertError};

/// Capacity of a map created with [`ProbeMap::new`]
pub const DEFAULT_CAPACITY: usize = 16;

/// A slot of the probe table
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    /// Never written since creation or the last clear; terminates a probe run
    Empty,
    /// Held an entry that was removed; probing continues past it
    Tombstone,
    /// Holds a live key-value pair
    Occupied {
        /// The key of the pair
        key: u64,
        /// The owned copy of the value
        value: String,
    },
}

impl Slot {
    /// Returns true if the slot holds a live pair
    fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied { .. })
    }

    /// Returns the live pair held by the slot, if any
    fn pair(&self) -> Option<(u64, &str)> {
        match self {
            Self::Occupied { key, value } => Some((*key, value.as_str())),
            Self::Empty | Self::Tombstone => None,
        }
    }
}

/// Index of an occupied slot, returned by the traversal methods of [`ProbeMap`].
///
/// A cursor only stays meaningful until the next mutating call on the map it came from.
/// Resolving a stale cursor with [`ProbeMap::pair`] yields `None` or whatever pair now
/// lives in that slot; it never dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Returns the raw position in the slot array
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Yields every slot index once, starting at `start` and wrapping past the end
fn probe_sequence(start: usize, capacity: usize) -> impl Iterator<Item = usize> {
    (start..capacity).chain(0..start)
}

/// A fixed-capacity map from `u64` keys to owned strings using linear probing.
///
/// The home slot of a key is `key % capacity`. Collisions are resolved by scanning
/// forward one slot at a time, wrapping at the end of the table. Removed entries leave a
/// tombstone behind so that keys placed further along the same probe run stay reachable;
/// later inserts reclaim tombstones.
///
/// The table never grows. Once every slot is occupied, inserting a new key fails with
/// [`InsertError::Full`].
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ProbeMap {
    /// The slot array, its length is the capacity
    slots: Box<[Slot]>,
    /// Number of occupied slots
    size: usize,
    /// Number of tombstone slots
    tombstones: usize,
}

impl Default for ProbeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeMap {
    /// Creates a new `ProbeMap` with [`DEFAULT_CAPACITY`] slots
    #[must_use]
    pub fn new() -> Self {
        Self { slots: vec![Slot::Empty; DEFAULT_CAPACITY].into_boxed_slice(), size: 0, tombstones: 0 }
    }

    /// Creates a new `ProbeMap` with exactly `capacity` slots
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::InvalidCapacity`] if `capacity` is zero and
    /// [`CreateError::AllocationFailure`] if the slot array cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, CreateError> {
        if capacity == 0 {
            return Err(CreateError::InvalidCapacity);
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| CreateError::AllocationFailure { capacity })?;
        slots.resize(capacity, Slot::Empty);

        Ok(Self { slots: slots.into_boxed_slice(), size: 0, tombstones: 0 })
    }

    /// Gets the home slot of a key
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn home_slot(&self, key: u64) -> usize {
        // The remainder is below the capacity, so it fits back into a usize
        (key % self.slots.len() as u64) as usize
    }

    /// Finds the slot holding `key`, returning its index and the number of slots inspected
    fn locate(&self, key: u64) -> Option<(usize, usize)> {
        for (step, index) in probe_sequence(self.home_slot(key), self.slots.len()).enumerate() {
            match self.slots.get(index)? {
                // End of the probe run, the key is not in the table
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied { key: stored, .. } => {
                    if *stored == key {
                        return Some((index, step.saturating_add(1)));
                    }
                }
            }
        }

        None
    }

    /// Returns the value stored under `key`
    #[must_use]
    pub fn find(&self, key: u64) -> Option<&str> {
        let (index, _) = self.locate(key)?;
        self.slots.get(index).and_then(Slot::pair).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored under `key`
    pub fn find_mut(&mut self, key: u64) -> Option<&mut String> {
        let (index, _) = self.locate(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns true if `key` is present
    #[must_use]
    pub fn contains(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Returns how many slots a lookup of `key` inspects, 1 meaning the key sits in its
    /// home slot. `None` if the key is absent.
    #[must_use]
    pub fn probe_length(&self, key: u64) -> Option<usize> {
        self.locate(key).map(|(_, probes)| probes)
    }

    /// Inserts a new key with an owned copy of `value`
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Full`] if every slot is occupied and
    /// [`InsertError::DuplicateKey`] if `key` is already present. The map is left
    /// unchanged in both cases.
    pub fn insert(&mut self, key: u64, value: &str) -> Result<(), InsertError> {
        let capacity = self.slots.len();
        if self.size >= capacity {
            debug!("rejecting key {key}: all {capacity} slots are occupied");
            return Err(InsertError::Full { capacity });
        }

        let mut first_tombstone = None;
        let mut vacant = None;
        for index in probe_sequence(self.home_slot(key), capacity) {
            match self.slots.get(index) {
                Some(Slot::Empty) => {
                    vacant = Some(index);
                    break;
                }
                Some(Slot::Tombstone) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Occupied { key: stored, .. }) => {
                    if *stored == key {
                        debug!("rejecting key {key}: already present in slot {index}");
                        return Err(InsertError::DuplicateKey(key));
                    }
                }
                None => break,
            }
        }

        // Reuse the earliest tombstone of the run so lookups stop sooner
        let Some(index) = first_tombstone.or(vacant) else {
            debug!("rejecting key {key}: no free slot after a full probe cycle");
            return Err(InsertError::Full { capacity });
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(InsertError::Full { capacity });
        };

        if matches!(slot, Slot::Tombstone) {
            self.tombstones = self.tombstones.saturating_sub(1);
            trace!("reclaiming tombstone in slot {index} for key {key}");
        }
        *slot = Slot::Occupied { key, value: value.to_owned() };
        self.size = self.size.saturating_add(1);
        trace!("placed key {key} in slot {index}");

        Ok(())
    }

    /// Stores an owned copy of `value` under `key`, replacing the current value if the
    /// key is present. Returns the replaced value.
    ///
    /// Replacing never consumes a slot, so it succeeds on a full map.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Full`] if `key` is absent and every slot is occupied.
    pub fn insert_or_assign(&mut self, key: u64, value: &str) -> Result<Option<String>, InsertError> {
        if let Some(current) = self.find_mut(key) {
            let previous = mem::replace(current, value.to_owned());
            trace!("assigned new value to key {key}");
            return Ok(Some(previous));
        }

        self.insert(key, value).map(|()| None)
    }

    /// Removes `key` from the map, returning its value
    pub fn remove(&mut self, key: u64) -> Option<String> {
        let (index, _) = self.locate(key)?;
        let slot = self.slots.get_mut(index)?;
        let Slot::Occupied { value, .. } = mem::replace(slot, Slot::Tombstone) else {
            return None;
        };

        self.size = self.size.saturating_sub(1);
        self.tombstones = self.tombstones.saturating_add(1);
        trace!("removed key {key} from slot {index}");
        self.drain_tombstones(index);

        Some(value)
    }

    /// Turns the tombstone at `index`, and the unbroken tombstone run ending there, back
    /// into empty slots when the slot after `index` is empty. No live key can have a probe
    /// run passing through them.
    fn drain_tombstones(&mut self, index: usize) {
        let capacity = self.slots.len();
        let after = match index.checked_add(1) {
            Some(next) if next < capacity => next,
            _ => 0,
        };
        if !matches!(self.slots.get(after), Some(Slot::Empty)) {
            return;
        }

        let mut current = index;
        for _ in 0..capacity {
            let Some(slot) = self.slots.get_mut(current) else {
                break;
            };
            if !matches!(slot, Slot::Tombstone) {
                break;
            }
            *slot = Slot::Empty;
            self.tombstones = self.tombstones.saturating_sub(1);
            trace!("cleared trailing tombstone in slot {current}");
            current = current.checked_sub(1).unwrap_or(capacity.saturating_sub(1));
        }
    }

    /// Drops every value and empties every slot. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.size = 0;
        self.tombstones = 0;
        trace!("cleared all {} slots", self.slots.len());
    }

    /// Returns the number of stored pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if no pair is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the fixed number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones currently in the table
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the ratio of stored pairs to slots, between 0.0 and 1.0
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Returns the lowest occupied slot
    #[must_use]
    pub fn first(&self) -> Option<SlotIndex> {
        self.slots.iter().position(Slot::is_occupied).map(SlotIndex)
    }

    /// Returns the highest occupied slot
    #[must_use]
    pub fn last(&self) -> Option<SlotIndex> {
        self.slots.iter().rposition(Slot::is_occupied).map(SlotIndex)
    }

    /// Returns the next occupied slot after `cursor`, wrapping past the end of the table.
    ///
    /// The scan covers every other slot once, so `None` means `cursor` is the only
    /// occupied slot. A walk over all pairs stops when it arrives back at its start:
    ///
    /// ```rust
    /// use probemap::ProbeMap;
    ///
    /// let mut map = ProbeMap::with_capacity(4).unwrap();
    /// map.insert(1, "one").unwrap();
    /// map.insert(3, "three").unwrap();
    ///
    /// let start = map.first().unwrap();
    /// let mut cursor = start;
    /// let mut keys = Vec::new();
    /// loop {
    ///     keys.push(map.pair(cursor).unwrap().0);
    ///     match map.next(cursor) {
    ///         Some(next) if next != start => cursor = next,
    ///         _ => break,
    ///     }
    /// }
    /// assert_eq!(keys, vec![1, 3]);
    /// ```
    #[must_use]
    pub fn next(&self, cursor: SlotIndex) -> Option<SlotIndex> {
        let capacity = self.slots.len();
        let start = match cursor.0.checked_add(1) {
            Some(next) if next < capacity => next,
            Some(next) if next == capacity => 0,
            _ => return None,
        };

        probe_sequence(start, capacity)
            .take(capacity.saturating_sub(1))
            .find(|&index| self.slots.get(index).is_some_and(Slot::is_occupied))
            .map(SlotIndex)
    }

    /// Returns the pair stored in the slot at `cursor`
    #[must_use]
    pub fn pair(&self, cursor: SlotIndex) -> Option<(u64, &str)> {
        self.slots.get(cursor.0).and_then(Slot::pair)
    }

    /// Returns an iterator over the stored pairs in slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: &self.slots, front: 0, back: self.slots.len() }
    }
}

impl PartialEq for ProbeMap {
    /// Two maps are equal when they have the same capacity and hold the same pairs,
    /// regardless of where the pairs sit in the table.
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity() &&
            self.size == other.size &&
            self.iter().all(|(key, value)| other.find(key) == Some(value))
    }
}

impl Eq for ProbeMap {}

impl<'a> IntoIterator for &'a ProbeMap {
    type Item = (u64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the pairs of a [`ProbeMap`] in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    /// The slot array being walked
    slots: &'a [Slot],
    /// Next position to inspect from the front
    front: usize,
    /// One past the next position to inspect from the back
    back: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let slot = self.slots.get(self.front);
            self.front = self.front.saturating_add(1);
            if let Some(pair) = slot.and_then(Slot::pair) {
                return Some(pair);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back.saturating_sub(self.front)))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back = self.back.saturating_sub(1);
            if let Some(pair) = self.slots.get(self.back).and_then(Slot::pair) {
                return Some(pair);
            }
        }
        None
    }
}

impl FusedIterator for Iter<'_> {}
