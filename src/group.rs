//! The generic ordered cache container.
//!
//! [`Group`] is an insertion-ordered, uniqueness-enforcing key/value store
//! used uniformly by every resource manager in this crate. It is composition
//! over a private ordered map — an order vector plus a hash map — rather
//! than an extension of either, so its surface is exactly the algebra below
//! and nothing more.
//!
//! Every derived operation (`find`, `filter`, `map`, …) is defined over the
//! sequence of values in insertion order; that sequence is the single source
//! of truth, and no operation special-cases ordering.

use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::CacheError;

/// An insertion-ordered map with unique keys and a query/transform algebra.
///
/// Upserting an existing key replaces its value and **preserves** its
/// position in the insertion order. `sorted`/`reversed` return detached
/// copies; the group's own order only changes through `set`, `remove`,
/// `merge`, and `sweep`.
#[derive(Clone)]
pub struct Group<K, V> {
    order: Vec<K>,
    entries: HashMap<K, V>,
}

impl<K, V> Default for Group<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<K, V> Group<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys currently present.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.order.len(), self.entries.len());
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ------------------------------------------------------------------
    // Point operations
    // ------------------------------------------------------------------

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Upsert. A new key is appended to the insertion order; an existing key
    /// keeps its position and only its value is replaced.
    pub fn set(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    /// Remove an entry, returning its value if the key was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// `true` iff every given key is present. Vacuously true for no keys.
    pub fn has_all<'a, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().all(|k| self.contains(k))
    }

    /// `true` iff at least one given key is present.
    pub fn has_any<'a, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().any(|k| self.contains(k))
    }

    // ------------------------------------------------------------------
    // The insertion-order sequence
    // ------------------------------------------------------------------

    /// Keys in insertion order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.order.iter()
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.order.iter().map(move |k| &self.entries[k])
    }

    /// `(key, value)` pairs in insertion order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator + '_ {
        self.order.iter().map(move |k| (k, &self.entries[k]))
    }

    // ------------------------------------------------------------------
    // Query algebra
    // ------------------------------------------------------------------

    /// First value (in insertion order) satisfying the predicate.
    pub fn find<P>(&self, mut predicate: P) -> Option<&V>
    where
        P: FnMut(&V) -> bool,
    {
        self.values().find(|v| predicate(v))
    }

    /// All values satisfying the predicate, in insertion order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&V>
    where
        P: FnMut(&V) -> bool,
    {
        self.values().filter(|v| predicate(v)).collect()
    }

    /// Transform every value, in insertion order.
    pub fn map<U, F>(&self, transform: F) -> Vec<U>
    where
        F: FnMut(&V) -> U,
    {
        self.values().map(transform).collect()
    }

    /// Left fold over values in insertion order, seeded with the first value.
    ///
    /// Fails with [`CacheError::EmptyReduce`] on an empty group.
    pub fn reduce<F>(&self, mut combine: F) -> Result<V, CacheError>
    where
        F: FnMut(V, &V) -> V,
        V: Clone,
    {
        let mut values = self.values();
        let first = values.next().ok_or(CacheError::EmptyReduce)?.clone();
        Ok(values.fold(first, |acc, v| combine(acc, v)))
    }

    /// Right-to-left counterpart of [`reduce`](Self::reduce).
    pub fn reduce_right<F>(&self, mut combine: F) -> Result<V, CacheError>
    where
        F: FnMut(V, &V) -> V,
        V: Clone,
    {
        let mut values = self.values().rev();
        let last = values.next().ok_or(CacheError::EmptyReduce)?.clone();
        Ok(values.fold(last, |acc, v| combine(acc, v)))
    }

    /// Short-circuiting "every value satisfies". Vacuously true when empty.
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&V) -> bool,
    {
        self.values().all(|v| predicate(v))
    }

    /// Short-circuiting "some value satisfies". False when empty.
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&V) -> bool,
    {
        self.values().any(|v| predicate(v))
    }

    // ------------------------------------------------------------------
    // Positional access
    // ------------------------------------------------------------------

    /// First value in insertion order.
    pub fn first(&self) -> Option<&V> {
        self.values().next()
    }

    /// Last value in insertion order.
    pub fn last(&self) -> Option<&V> {
        self.values().next_back()
    }

    /// A new group holding the first `n` entries in order. Tolerant of `n`
    /// exceeding the current size (returns everything).
    pub fn first_n(&self, n: usize) -> Group<K, V>
    where
        V: Clone,
    {
        self.entries()
            .take(n)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// A new group holding the last `n` entries, original order preserved.
    pub fn last_n(&self, n: usize) -> Group<K, V>
    where
        V: Clone,
    {
        let skip = self.len().saturating_sub(n);
        self.entries()
            .skip(skip)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Zero-based positional lookup over the insertion order. Negative
    /// indices count from the end.
    pub fn at(&self, index: isize) -> Option<&V> {
        let len = self.len() as isize;
        let resolved = if index < 0 { len + index } else { index };
        if (0..len).contains(&resolved) {
            self.values().nth(resolved as usize)
        } else {
            None
        }
    }

    /// Uniform random value, or `None` on an empty group.
    pub fn random(&self) -> Option<&V> {
        self.random_key().map(|k| &self.entries[k])
    }

    /// Uniform random key, or `None` on an empty group.
    pub fn random_key(&self) -> Option<&K> {
        if self.order.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.order.len());
        self.order.get(index)
    }

    // ------------------------------------------------------------------
    // Detached views
    // ------------------------------------------------------------------

    /// Values sorted by the comparator, as a detached copy. The group's own
    /// insertion order is untouched.
    pub fn sorted_by<F>(&self, mut comparator: F) -> Vec<&V>
    where
        F: FnMut(&V, &V) -> std::cmp::Ordering,
    {
        let mut values: Vec<&V> = self.values().collect();
        values.sort_by(|a, b| comparator(a, b));
        values
    }

    /// Values sorted by natural order, as a detached copy.
    pub fn sorted(&self) -> Vec<&V>
    where
        V: Ord,
    {
        self.sorted_by(V::cmp)
    }

    /// Values in reverse insertion order, as a detached copy.
    pub fn reversed(&self) -> Vec<&V> {
        self.values().rev().collect()
    }

    // ------------------------------------------------------------------
    // Bulk mutation
    // ------------------------------------------------------------------

    /// Upsert every entry of `other` into `self`; on key collision the entry
    /// from `other` wins. Returns `self` for chaining.
    pub fn merge(&mut self, other: Group<K, V>) -> &mut Self {
        let Group { order, mut entries } = other;
        for key in order {
            if let Some(value) = entries.remove(&key) {
                self.set(key, value);
            }
        }
        self
    }

    /// Delete every entry whose `(key, value)` pair satisfies the predicate,
    /// returning how many were removed.
    ///
    /// The predicate runs over a detached snapshot of the keys taken before
    /// any deletion, so removals mid-scan can never skip or double-process
    /// an entry, and survivors keep their relative order.
    pub fn sweep<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&K, &V) -> bool,
    {
        let doomed: Vec<K> = self
            .entries()
            .filter(|(k, v)| predicate(k, v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            self.entries.remove(key);
        }
        self.order.retain(|k| self.entries.contains_key(k));
        doomed.len()
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// String-keyed JSON object of the current contents, entries in
    /// insertion order.
    ///
    /// A value that fails to serialize surfaces the error; nothing is
    /// silently replaced.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value>
    where
        K: fmt::Display,
        V: Serialize,
    {
        let mut object = serde_json::Map::with_capacity(self.len());
        for (key, value) in self.entries() {
            object.insert(key.to_string(), serde_json::to_value(value)?);
        }
        Ok(serde_json::Value::Object(object))
    }
}

impl<K, V> FromIterator<(K, V)> for Group<K, V>
where
    K: Hash + Eq + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut group = Group::new();
        for (key, value) in iter {
            group.set(key, value);
        }
        group
    }
}

impl<K, V> fmt::Debug for Group<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Group<crate::snowflake::Snowflake, i32>: Send, Sync, Clone);

    fn abc() -> Group<u32, &'static str> {
        [(1, "a"), (2, "b"), (3, "c")].into_iter().collect()
    }

    // -- size invariant ----------------------------------------------------

    #[test]
    fn duplicate_keys_never_grow_the_group() {
        let mut group = Group::new();
        for key in [1u32, 2, 1, 3, 2, 1] {
            group.set(key, key * 10);
        }
        assert_eq!(group.len(), 3);
        assert_eq!(group.get(&1), Some(&10));
    }

    #[test]
    fn empty_iff_len_zero() {
        let mut group: Group<u32, ()> = Group::new();
        assert!(group.is_empty());
        group.set(1, ());
        assert!(!group.is_empty());
        group.remove(&1);
        assert!(group.is_empty());
    }

    #[test]
    fn upsert_preserves_position() {
        let mut group = abc();
        group.set(1, "A");
        let values: Vec<_> = group.values().copied().collect();
        assert_eq!(values, ["A", "b", "c"]);
    }

    #[test]
    fn remove_returns_the_value() {
        let mut group = abc();
        assert_eq!(group.remove(&2), Some("b"));
        assert_eq!(group.remove(&2), None);
        let keys: Vec<_> = group.keys().copied().collect();
        assert_eq!(keys, [1, 3]);
    }

    // -- query algebra -----------------------------------------------------

    #[test]
    fn find_returns_first_match_in_insertion_order() {
        let group = abc();
        assert_eq!(group.find(|v| *v > "a"), Some(&"b"));
        assert_eq!(group.find(|v| *v == "z"), None);
    }

    #[test]
    fn filter_and_map_preserve_order() {
        let group = abc();
        assert_eq!(group.filter(|v| *v != "b"), [&"a", &"c"]);
        assert_eq!(group.map(|v| v.to_uppercase()), ["A", "B", "C"]);
    }

    #[test]
    fn reduce_folds_left() {
        let group: Group<u32, i64> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        assert_eq!(group.reduce(|acc, v| acc + v).unwrap(), 6);
    }

    #[test]
    fn reduce_right_folds_from_the_end() {
        let group: Group<u32, String> = [(1, "a"), (2, "b"), (3, "c")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        assert_eq!(group.reduce_right(|acc, v| acc + v).unwrap(), "cba");
    }

    #[test]
    fn reduce_on_empty_group_errors() {
        let group: Group<u32, i64> = Group::new();
        assert!(matches!(
            group.reduce(|acc, v| acc + v),
            Err(CacheError::EmptyReduce)
        ));
        assert!(matches!(
            group.reduce_right(|acc, v| acc + v),
            Err(CacheError::EmptyReduce)
        ));
    }

    #[test]
    fn all_and_any_short_circuit() {
        let group = abc();
        let mut seen = 0;
        assert!(!group.all(|_| {
            seen += 1;
            false
        }));
        assert_eq!(seen, 1);

        seen = 0;
        assert!(group.any(|_| {
            seen += 1;
            true
        }));
        assert_eq!(seen, 1);
    }

    #[test]
    fn all_is_vacuously_true_on_empty() {
        let group: Group<u32, ()> = Group::new();
        assert!(group.all(|_| false));
        assert!(!group.any(|_| true));
    }

    // -- positional access -------------------------------------------------

    #[test]
    fn first_and_last() {
        let group = abc();
        assert_eq!(group.first(), Some(&"a"));
        assert_eq!(group.last(), Some(&"c"));
        assert_eq!(Group::<u32, ()>::new().first(), None);
    }

    #[test]
    fn first_n_is_an_order_preserving_prefix() {
        let group = abc();
        let prefix = group.first_n(2);
        let entries: Vec<_> = prefix.entries().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, [(1, "a"), (2, "b")]);
    }

    #[test]
    fn last_n_is_an_order_preserving_suffix() {
        let group = abc();
        let suffix = group.last_n(1);
        let entries: Vec<_> = suffix.entries().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, [(3, "c")]);
    }

    #[test]
    fn first_n_tolerates_oversized_n() {
        let group = abc();
        assert_eq!(group.first_n(10).len(), 3);
        assert_eq!(group.last_n(10).len(), 3);
    }

    #[test]
    fn at_supports_negative_indices() {
        let group = abc();
        assert_eq!(group.at(0), Some(&"a"));
        assert_eq!(group.at(2), Some(&"c"));
        assert_eq!(group.at(-1), Some(&"c"));
        assert_eq!(group.at(-3), Some(&"a"));
        assert_eq!(group.at(3), None);
        assert_eq!(group.at(-4), None);
    }

    #[test]
    fn random_is_none_on_empty_and_a_member_otherwise() {
        let empty: Group<u32, ()> = Group::new();
        assert!(empty.random().is_none());
        assert!(empty.random_key().is_none());

        let group = abc();
        for _ in 0..32 {
            let v = group.random().expect("non-empty group");
            assert!(["a", "b", "c"].contains(v));
            let k = group.random_key().expect("non-empty group");
            assert!(group.contains(k));
        }
    }

    #[test]
    fn has_all_and_has_any() {
        let group = abc();
        assert!(group.has_all([&1, &2, &3]));
        assert!(!group.has_all([&1, &4]));
        assert!(group.has_any([&4, &2]));
        assert!(!group.has_any([&4, &5]));
        // Vacuous cases.
        assert!(group.has_all(std::iter::empty()));
        assert!(!group.has_any(std::iter::empty()));
    }

    // -- detached views ----------------------------------------------------

    #[test]
    fn sorted_is_detached_from_insertion_order() {
        let group: Group<u32, i32> = [(1, 3), (2, 1), (3, 2)].into_iter().collect();
        assert_eq!(group.sorted(), [&1, &2, &3]);
        // Insertion order untouched.
        let values: Vec<_> = group.values().copied().collect();
        assert_eq!(values, [3, 1, 2]);
    }

    #[test]
    fn sorted_by_uses_the_comparator() {
        let group: Group<u32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        assert_eq!(group.sorted_by(|a, b| b.cmp(a)), [&3, &2, &1]);
    }

    #[test]
    fn reversed_is_detached() {
        let group = abc();
        assert_eq!(group.reversed(), [&"c", &"b", &"a"]);
        assert_eq!(group.first(), Some(&"a"));
    }

    // -- bulk mutation -----------------------------------------------------

    #[test]
    fn merge_later_source_wins() {
        let mut a: Group<u32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
        let b: Group<u32, &str> = [(2, "B"), (3, "C")].into_iter().collect();
        a.merge(b);
        assert_eq!(a.get(&1), Some(&"a"));
        assert_eq!(a.get(&2), Some(&"B"));
        assert_eq!(a.get(&3), Some(&"C"));
        let keys: Vec<_> = a.keys().copied().collect();
        assert_eq!(keys, [1, 2, 3]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = abc();
        let mut copy = original.clone();
        copy.set(4, "d");
        original.remove(&1);
        assert_eq!(original.len(), 2);
        assert_eq!(copy.len(), 4);
        assert_eq!(copy.get(&1), Some(&"a"));
    }

    #[test]
    fn sweep_removes_exactly_the_matches_and_keeps_order() {
        let mut group: Group<u32, i32> =
            (1u32..=6).map(|k| (k, k as i32)).collect();
        let removed = group.sweep(|_, v| v % 2 == 0);
        assert_eq!(removed, 3);
        let values: Vec<_> = group.values().copied().collect();
        assert_eq!(values, [1, 3, 5]);
    }

    #[test]
    fn sweep_predicate_sees_a_snapshot() {
        // A predicate that deletes everything processes each entry once.
        let mut group = abc();
        let mut seen = 0;
        let removed = group.sweep(|_, _| {
            seen += 1;
            true
        });
        assert_eq!(seen, 3);
        assert_eq!(removed, 3);
        assert!(group.is_empty());
    }

    #[test]
    fn sweep_with_no_matches_removes_nothing() {
        let mut group = abc();
        assert_eq!(group.sweep(|_, _| false), 0);
        assert_eq!(group.len(), 3);
    }

    // -- export ------------------------------------------------------------

    #[test]
    fn to_json_stringifies_keys() {
        let group: Group<u32, i32> = [(1, 10), (2, 20)].into_iter().collect();
        let json = group.to_json().unwrap();
        assert_eq!(json["1"], 10);
        assert_eq!(json["2"], 20);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn to_json_preserves_insertion_order() {
        let group: Group<u32, i32> = [(3, 30), (1, 10), (2, 20)].into_iter().collect();
        let json = group.to_json().unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["3", "1", "2"]);
    }

    #[test]
    fn to_json_surfaces_serialization_failures() {
        // Tuple map keys cannot become JSON object keys.
        let unencodable: HashMap<(u8, u8), i32> = [((1, 2), 3)].into_iter().collect();
        let mut group = Group::new();
        group.set(1u32, unencodable);
        assert!(group.to_json().is_err());
    }
}
