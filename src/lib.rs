#![doc = include_str!("../README.md")]

#![no_std]

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

extern crate alloc;
#[cfg(test)]
extern crate std;

use core::{fmt, mem};
use core::iter::{FromIterator, FusedIterator};

use alloc::vec;
use alloc::vec::Vec;

use tracing::Level;

/// Bucket count used by [`LongHashMap::new`] and when a zero bucket count is requested.
pub const DEFAULT_BUCKET_COUNT: usize = 16;

/// Numerator of the load factor (0.75).
///
/// The map grows once `len > bucket_count * LOAD_FACTOR_NUM / LOAD_FACTOR_DEN`.
pub const LOAD_FACTOR_NUM: usize = 3;
/// Denominator of the load factor (0.75).
pub const LOAD_FACTOR_DEN: usize = 4;

/// The operations every `i64`-keyed map in this crate supports.
///
/// Missing keys are reported as `None`, never as errors.
pub trait LongMap<V> {
    /// Binds `value` to `key`, returning the value it replaced.
    fn put(&mut self, key: i64, value: V) -> Option<V>;

    fn get(&self, key: i64) -> Option<&V>;

    /// Unbinds `key`, returning the value it held.
    fn remove(&mut self, key: i64) -> Option<V>;

    fn contains_key(&self, key: i64) -> bool;

    fn contains_value(&self, value: &V) -> bool;

    /// All keys, positionally paired with [`LongMap::values`].
    fn keys(&self) -> Vec<i64>;

    /// All values, positionally paired with [`LongMap::keys`].
    fn values(&self) -> Vec<&V>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// A single binding, linked to the next entry of the same bucket.
#[derive(Debug, Clone)]
struct Entry<V> {
    key: i64,
    value: V,

    // index into the entries vec of the next entry in this chain
    next: Option<usize>,
}

impl<V> Entry<V> {
    #[inline(always)]
    const fn new(key: i64, value: V) -> Self {
        Self { key, value, next: None }
    }
}

/// Folds the high half of the key into the low half.
#[inline(always)]
const fn fold(key: i64) -> u32 {
    let bits = key as u64;
    (bits ^ (bits >> 32)) as u32
}

/// A separately chained hash map from `i64` keys to `V`.
///
/// Every bucket holds the head of a singly linked chain. The chain nodes are
/// stored in one contiguous vec and link to each other by index, so removing
/// an entry is a `swap_remove` plus fixing the one link that pointed at the
/// moved entry.
///
/// The bucket array doubles whenever the map becomes more than 75% full.
pub struct LongHashMap<V> {
    buckets: Vec<Option<usize>>, // bucket -> head of its chain
    entries: Vec<Entry<V>>, // every live entry, in no particular order
}

impl<V> LongHashMap<V> {
    /// Creates an empty map with [`DEFAULT_BUCKET_COUNT`] buckets.
    #[inline]
    pub fn new() -> Self {
        Self::with_bucket_count(DEFAULT_BUCKET_COUNT)
    }

    /// Creates an empty map with `n` buckets.
    ///
    /// A bucket count of 0 falls back to [`DEFAULT_BUCKET_COUNT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use long_map::{LongHashMap, DEFAULT_BUCKET_COUNT};
    ///
    /// let map = LongHashMap::<&str>::with_bucket_count(0);
    /// assert_eq!(map.bucket_count(), DEFAULT_BUCKET_COUNT);
    /// ```
    #[inline]
    pub fn with_bucket_count(n: usize) -> Self {
        let n = if n == 0 { DEFAULT_BUCKET_COUNT } else { n };
        Self {
            buckets: vec![None; n],
            entries: Vec::new(),
        }
    }

    /// Returns the current number of buckets.
    #[inline(always)]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of entries in the map.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    fn bucket_index(&self, key: i64) -> usize {
        fold(key) as usize % self.buckets.len()
    }

    /// Walks the chain of `key`'s bucket, returning the entry index holding `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    fn find(&self, key: i64) -> Option<usize> {
        let mut link = self.buckets[self.bucket_index(key)];
        while let Some(idx) = link {
            let entry = &self.entries[idx];
            if entry.key == key {
                return Some(idx)
            }
            link = entry.next;
        }
        None
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present, its value is replaced in place and the
    /// old value is returned. Otherwise the entry is appended to the tail of
    /// its bucket's chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_map::LongHashMap;
    ///
    /// let mut map = LongHashMap::new();
    /// assert_eq!(map.put(1, "A"), None);
    /// assert_eq!(map.put(1, "B"), Some("A"));
    /// assert_eq!(map.get(1), Some(&"B"));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn put(&mut self, key: i64, value: V) -> Option<V> {
        let bucket = self.bucket_index(key);

        let mut tail = None;
        let mut link = self.buckets[bucket];
        while let Some(idx) = link {
            let entry = &mut self.entries[idx];
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value))
            }
            tail = Some(idx);
            link = entry.next;
        }

        let idx = self.entries.len();
        self.entries.push(Entry::new(key, value));
        self.link_tail(bucket, tail, idx);
        self.grow_if_needed();
        None
    }

    /// Returns a reference to the value bound to `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get(&self, key: i64) -> Option<&V> {
        self.find(key).map(|idx| &self.entries[idx].value)
    }

    /// Returns a mutable reference to the value bound to `key`.
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn get_mut(&mut self, key: i64) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(&mut self.entries[idx].value)
    }

    /// Returns `true` if the map contains a value for `key`.
    #[inline]
    pub fn contains_key(&self, key: i64) -> bool {
        self.find(key).is_some()
    }

    /// Returns `true` if any entry holds a value equal to `value`.
    ///
    /// This is a linear scan over every entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_map::LongHashMap;
    ///
    /// let mut map = LongHashMap::new();
    /// map.put(7, vec![1, 2]);
    /// assert!(map.contains_value(&vec![1, 2]));
    /// assert!(!map.contains_value(&vec![2, 1]));
    /// ```
    #[inline]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq
    {
        self.entries.iter().any(|entry| entry.value == *value)
    }

    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use long_map::LongHashMap;
    ///
    /// let mut map = LongHashMap::new();
    /// map.put(1, "a");
    /// assert_eq!(map.remove(1), Some("a"));
    /// assert_eq!(map.remove(1), None);
    /// assert!(map.is_empty());
    /// ```
    #[cfg_attr(feature = "inline-more", inline)]
    pub fn remove(&mut self, key: i64) -> Option<V> {
        let bucket = self.bucket_index(key);

        let mut prev: Option<usize> = None;
        let mut link = self.buckets[bucket];
        while let Some(idx) = link {
            let entry = &self.entries[idx];
            if entry.key == key {
                let next = entry.next;
                match prev {
                    Some(prev_idx) => self.entries[prev_idx].next = next,
                    None => self.buckets[bucket] = next
                }
                return Some(self.release(idx))
            }
            prev = Some(idx);
            link = entry.next;
        }
        None
    }

    /// Returns every key, in the same order as [`LongHashMap::values`].
    ///
    /// The order follows the bucket layout and changes as the map is modified.
    #[inline]
    pub fn keys(&self) -> Vec<i64> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Returns every value, in the same order as [`LongHashMap::keys`].
    ///
    /// # Examples
    ///
    /// ```
    /// use long_map::LongHashMap;
    ///
    /// let mut map = LongHashMap::new();
    /// assert!(map.values().is_empty());
    ///
    /// map.put(10, 'x');
    /// map.put(20, 'y');
    /// let (keys, values) = (map.keys(), map.values());
    /// for (key, value) in keys.iter().zip(values) {
    ///     assert_eq!(map.get(*key), Some(value));
    /// }
    /// ```
    #[inline]
    pub fn values(&self) -> Vec<&V> {
        if self.is_empty() {
            return Vec::new()
        }
        self.iter().map(|(_, value)| value).collect()
    }

    /// Removes every entry. The bucket count is left unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|head| *head = None);
        self.entries.clear();
    }

    /// Returns an iterator over all entries, bucket by bucket, each chain head to tail.
    ///
    /// The iterator implements `ExactSizeIterator` and `FusedIterator`.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: &self.buckets,
            entries: &self.entries,
            bucket: 0,
            curr: None,
            remaining: self.entries.len(),
        }
    }

    /// Links entry `idx` after `tail`, or makes it the head of `bucket`.
    #[inline(always)]
    fn link_tail(&mut self, bucket: usize, tail: Option<usize>, idx: usize) {
        match tail {
            Some(tail_idx) => self.entries[tail_idx].next = Some(idx),
            None => self.buckets[bucket] = Some(idx)
        }
    }

    /// Drops the already unlinked entry `idx` out of the entries vec.
    ///
    /// The last entry is moved into `idx`, so the link pointing at it is redirected first.
    fn release(&mut self, idx: usize) -> V {
        let last = self.entries.len() - 1;
        if idx != last {
            self.redirect(last, idx);
        }
        self.entries.swap_remove(idx).value
    }

    /// Rewrites the single link pointing at entry `from` to point at `to`.
    fn redirect(&mut self, from: usize, to: usize) {
        let bucket = self.bucket_index(self.entries[from].key);
        if self.buckets[bucket] == Some(from) {
            self.buckets[bucket] = Some(to);
            return
        }

        let mut link = self.buckets[bucket];
        while let Some(idx) = link {
            let entry = &mut self.entries[idx];
            if entry.next == Some(from) {
                entry.next = Some(to);
                return
            }
            link = entry.next;
        }

        debug_assert!(false, "entry {from} is not linked from its bucket");
    }

    #[inline]
    fn grow_if_needed(&mut self) {
        if self.entries.len() * LOAD_FACTOR_DEN > self.buckets.len() * LOAD_FACTOR_NUM {
            self.rehash(self.buckets.len() * 2);
        }
    }

    /// Rebuilds every chain for `n` buckets.
    ///
    /// Entries keep their slots; only the links change. Each entry is
    /// appended to the tail of its new chain, so relative order within a
    /// chain follows entry order.
    fn rehash(&mut self, n: usize) {
        tracing::event!(Level::DEBUG,
            name = "Growing buckets",
            old_buckets = self.buckets.len(),
            new_buckets = n,
            len = self.entries.len()
        );

        self.buckets = vec![None; n];
        let mut tails = vec![None; n];

        for idx in 0..self.entries.len() {
            let bucket = self.bucket_index(self.entries[idx].key);
            self.entries[idx].next = None;
            self.link_tail(bucket, tails[bucket], idx);
            tails[bucket] = Some(idx);
        }
    }
}

impl<V: PartialEq> LongMap<V> for LongHashMap<V> {
    #[inline]
    fn put(&mut self, key: i64, value: V) -> Option<V> {
        LongHashMap::put(self, key, value)
    }

    #[inline]
    fn get(&self, key: i64) -> Option<&V> {
        LongHashMap::get(self, key)
    }

    #[inline]
    fn remove(&mut self, key: i64) -> Option<V> {
        LongHashMap::remove(self, key)
    }

    #[inline]
    fn contains_key(&self, key: i64) -> bool {
        LongHashMap::contains_key(self, key)
    }

    #[inline]
    fn contains_value(&self, value: &V) -> bool {
        LongHashMap::contains_value(self, value)
    }

    #[inline]
    fn keys(&self) -> Vec<i64> {
        LongHashMap::keys(self)
    }

    #[inline]
    fn values(&self) -> Vec<&V> {
        LongHashMap::values(self)
    }

    #[inline]
    fn len(&self) -> usize {
        LongHashMap::len(self)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        LongHashMap::is_empty(self)
    }

    #[inline]
    fn clear(&mut self) {
        LongHashMap::clear(self)
    }
}

/// Borrowing iterator over the entries of a `LongHashMap`.
#[derive(Debug)]
pub struct Iter<'a, V> {
    buckets: &'a [Option<usize>],
    entries: &'a [Entry<V>],
    bucket: usize,
    curr: Option<usize>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    #[cfg_attr(feature = "inline-more", inline)]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(idx) = self.curr {
                let entry = &self.entries[idx];
                self.curr = entry.next;
                self.remaining -= 1;
                return Some((entry.key, &entry.value))
            }

            // next non-empty bucket
            let head = *self.buckets.get(self.bucket)?;
            self.bucket += 1;
            self.curr = head;
        }
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a LongHashMap<V> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> FromIterator<(i64, V)> for LongHashMap<V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn from_iter<T: IntoIterator<Item = (i64, V)>>(iter: T) -> Self {
        let mut map = LongHashMap::new();
        map.extend(iter);
        map
    }
}

impl<V> Extend<(i64, V)> for LongHashMap<V> {
    #[cfg_attr(feature = "inline-more", inline)]
    fn extend<T: IntoIterator<Item = (i64, V)>>(&mut self, iter: T) {
        let iter = iter.into_iter();
        self.entries.reserve(iter.size_hint().0);
        iter.for_each(move |(k, v)| _ = self.put(k, v));
    }
}

impl<V> Default for LongHashMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for LongHashMap<V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// Two maps are equal when they hold the same bindings, whatever their layout.
impl<V: PartialEq> PartialEq for LongHashMap<V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<V: Eq> Eq for LongHashMap<V> {}

impl<V: fmt::Debug> fmt::Debug for LongHashMap<V> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
