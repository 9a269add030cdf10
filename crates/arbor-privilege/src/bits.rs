//! Bit encoding of privileges.
//!
//! Every atomic privilege owns one bit position. Any privilege, atomic or
//! aggregate, is represented as the set of bits of the atomic privileges it
//! covers, so "does P include C" is a subset test rather than a graph walk.
//! The set grows word by word, so the encoding width is bounded only by the
//! allocator's capacity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PrivilegeError, PrivilegeResult};

const WORD_BITS: u32 = u64::BITS;

/// A set of privilege bit positions.
///
/// Trailing zero words are never stored, so two sets with the same
/// positions are always equal regardless of how they were built.
///
/// # Example
///
/// ```
/// use arbor_privilege::PrivilegeBits;
///
/// let read = PrivilegeBits::singleton(0);
/// let write = PrivilegeBits::singleton(70);
/// let both = read.union(&write);
///
/// assert!(both.includes(&read));
/// assert!(read.is_subset_of(&both));
/// assert_eq!(both.positions().collect::<Vec<_>>(), vec![0, 70]);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct PrivilegeBits {
    words: Vec<u64>,
}

impl PrivilegeBits {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set holding a single position.
    pub fn singleton(position: u32) -> Self {
        let mut bits = Self::empty();
        bits.insert(position);
        bits
    }

    /// Build a set from raw words, least significant word first.
    pub fn from_words(words: Vec<u64>) -> Self {
        let mut bits = Self { words };
        bits.trim();
        bits
    }

    /// The raw words, least significant word first.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Add a position to the set.
    pub fn insert(&mut self, position: u32) {
        let word = (position / WORD_BITS) as usize;
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (position % WORD_BITS);
    }

    /// Whether the position is in the set.
    pub fn contains(&self, position: u32) -> bool {
        let word = (position / WORD_BITS) as usize;
        self.words
            .get(word)
            .is_some_and(|w| w & (1u64 << (position % WORD_BITS)) != 0)
    }

    /// Whether the set holds no positions.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of positions in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Add every position of `other` to this set.
    pub fn add(&mut self, other: &PrivilegeBits) {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
    }

    /// The union of two sets.
    pub fn union(&self, other: &PrivilegeBits) -> PrivilegeBits {
        let mut bits = self.clone();
        bits.add(other);
        bits
    }

    /// The union of any number of sets.
    pub fn union_all<'a>(sets: impl IntoIterator<Item = &'a PrivilegeBits>) -> PrivilegeBits {
        sets.into_iter().fold(PrivilegeBits::empty(), |mut acc, bits| {
            acc.add(bits);
            acc
        })
    }

    /// Positions present in both sets.
    pub fn intersection(&self, other: &PrivilegeBits) -> PrivilegeBits {
        PrivilegeBits::from_words(
            self.words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        )
    }

    /// Positions of this set missing from `other`.
    pub fn difference(&self, other: &PrivilegeBits) -> PrivilegeBits {
        PrivilegeBits::from_words(
            self.words
                .iter()
                .enumerate()
                .map(|(i, w)| w & !other.words.get(i).copied().unwrap_or(0))
                .collect(),
        )
    }

    /// Whether every position of `other` is in this set.
    pub fn includes(&self, other: &PrivilegeBits) -> bool {
        other.words.iter().enumerate().all(|(i, theirs)| {
            let mine = self.words.get(i).copied().unwrap_or(0);
            theirs & !mine == 0
        })
    }

    /// Whether every position of this set is in `other`.
    pub fn is_subset_of(&self, other: &PrivilegeBits) -> bool {
        other.includes(self)
    }

    /// Iterate over the positions in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i as u32 * WORD_BITS + bit)
        })
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }
}

impl From<Vec<u64>> for PrivilegeBits {
    fn from(words: Vec<u64>) -> Self {
        Self::from_words(words)
    }
}

impl From<PrivilegeBits> for Vec<u64> {
    fn from(bits: PrivilegeBits) -> Self {
        bits.words
    }
}

impl fmt::Debug for PrivilegeBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.positions()).finish()
    }
}

impl fmt::Display for PrivilegeBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.words.is_empty() {
            return f.write_str("0x0");
        }
        f.write_str("0x")?;
        for (i, word) in self.words.iter().rev().enumerate() {
            if i == 0 {
                write!(f, "{word:x}")?;
            } else {
                write!(f, "{word:016x}")?;
            }
        }
        Ok(())
    }
}

/// Hands out bit positions to atomic privileges.
///
/// Positions are assigned in registration order and never reused, so
/// persisted bit-encoded entries stay valid as long as registration order
/// is stable.
#[derive(Debug, Clone)]
pub struct BitAllocator {
    next: u32,
    capacity: u32,
}

impl BitAllocator {
    /// Create an allocator for at most `capacity` positions.
    pub fn new(capacity: u32) -> Self {
        Self { next: 0, capacity }
    }

    /// Claim the next unused position.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` once every position is taken.
    pub fn allocate(&mut self) -> PrivilegeResult<u32> {
        if self.next >= self.capacity {
            return Err(PrivilegeError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let position = self.next;
        self.next += 1;
        Ok(position)
    }

    /// Number of positions handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next
    }

    /// Maximum number of positions.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Positions still available.
    pub fn remaining(&self) -> u32 {
        self.capacity - self.next
    }
}
