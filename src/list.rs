//! # OrderedList
//!
//! A generic doubly-linked sequence with a movable cursor. It is the storage
//! behind every [`ListGenome`](crate::genome::ListGenome).
//!
//! Nodes live in an arena owned by the list and refer to their neighbours by
//! slot index, so the chain can be walked in both directions without shared
//! ownership or `unsafe`. Slots freed by [`OrderedList::remove`] are reused by
//! later inserts.
//!
//! The cursor ("current" node) is valid exactly when the list is non-empty.
//! Every insert leaves the cursor on the inserted node, which makes repeated
//! `Location::After` inserts append a run of values in order.
//!
//! ## Example
//!
//! ```rust
//! use genlist::list::{Location, OrderedList};
//!
//! let mut list = OrderedList::new();
//! list.insert('b', Location::Tail);
//! list.insert('a', Location::Head);
//! list.insert('c', Location::Tail);
//! assert_eq!(list.to_vec(), vec!['a', 'b', 'c']);
//!
//! list.swap(0, 2).unwrap();
//! assert_eq!(list.to_string(), "c b a");
//!
//! list.warp(1).unwrap();
//! assert_eq!(list.remove().unwrap(), 'b');
//! assert_eq!(list.current(), Some(&'a'));
//! ```

use std::fmt;
use std::mem;

use crate::error::{GeneticError, Result};

/// Where [`OrderedList::insert`] places a value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// In front of the first node.
    Head,
    /// Behind the last node.
    Tail,
    /// Immediately before the cursor.
    Before,
    /// Immediately after the cursor.
    After,
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// An ordered, doubly-linked list with a cursor.
#[derive(Clone)]
pub struct OrderedList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    current: Option<usize>,
    len: usize,
}

impl<T> OrderedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            current: None,
            len: 0,
        }
    }

    /// Returns the number of values in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `value` relative to `location` and moves the cursor onto it.
    ///
    /// `Before` and `After` on an empty list create its single node.
    pub fn insert(&mut self, value: T, location: Location) {
        let anchor = match location {
            Location::Head => self.head,
            Location::Tail => self.tail,
            Location::Before | Location::After => self.current,
        };

        let slot = match (anchor, location) {
            (None, _) => self.link_first(value),
            (Some(anchor), Location::Head) | (Some(anchor), Location::Before) => {
                self.link_before(anchor, value)
            }
            (Some(anchor), Location::Tail) | (Some(anchor), Location::After) => {
                self.link_after(anchor, value)
            }
        };

        self.len += 1;
        self.current = Some(slot);
    }

    /// Splices every value of `other`, in order, at `location`.
    ///
    /// The first value is placed according to `location`, the rest follow it.
    /// The cursor rests on the last spliced value.
    pub fn insert_list(&mut self, other: OrderedList<T>, location: Location) {
        let mut values = other.into_iter();
        if let Some(first) = values.next() {
            self.insert(first, location);
            for value in values {
                self.insert(value, Location::After);
            }
        }
    }

    /// Removes and returns the value under the cursor.
    ///
    /// The cursor moves to the following node, or to the preceding node when
    /// the tail was removed. It is invalidated when the list becomes empty.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyContainer` if the list is empty.
    pub fn remove(&mut self) -> Result<T> {
        let slot = self.current.ok_or(GeneticError::EmptyContainer)?;
        let node = self
            .slots
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or(GeneticError::EmptyContainer)?;
        self.free.push(slot);

        match node.prev {
            Some(prev) => self.set_next(prev, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.set_prev(next, node.prev),
            None => self.tail = node.prev,
        }

        self.len -= 1;
        self.current = node.next.or(node.prev);

        if self.len == 0 {
            self.slots.clear();
            self.free.clear();
        }

        Ok(node.value)
    }

    /// Exchanges the values at positions `i` and `j`. Node identities and
    /// the cursor are untouched.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Index` if either position is outside `[0, len)`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let a = self.slot_at(i)?;
        let b = self.slot_at(j)?;
        if a == b {
            return Ok(());
        }

        let (lo, hi) = (a.min(b), a.max(b));
        let (left, right) = self.slots.split_at_mut(hi);
        if let (Some(x), Some(y)) = (left[lo].as_mut(), right[0].as_mut()) {
            mem::swap(&mut x.value, &mut y.value);
        }
        Ok(())
    }

    /// Drops every node and invalidates the cursor.
    pub fn destroy(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.current = None;
        self.len = 0;
    }

    /// Returns the value under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.current.and_then(|slot| self.value_of(slot))
    }

    /// Moves the cursor to the first node.
    pub fn move_to_head(&mut self) -> Option<&T> {
        self.current = self.head;
        self.current()
    }

    /// Moves the cursor to the last node.
    pub fn move_to_tail(&mut self) -> Option<&T> {
        self.current = self.tail;
        self.current()
    }

    /// Advances the cursor one node. At the tail the cursor stays put and
    /// `None` is returned.
    pub fn move_next(&mut self) -> Option<&T> {
        let next = self.current.and_then(|slot| self.node(slot)?.next)?;
        self.current = Some(next);
        self.current()
    }

    /// Moves the cursor back one node. At the head the cursor stays put and
    /// `None` is returned.
    pub fn move_prev(&mut self) -> Option<&T> {
        let prev = self.current.and_then(|slot| self.node(slot)?.prev)?;
        self.current = Some(prev);
        self.current()
    }

    /// Moves the cursor to position `index`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Index` if `index` is outside `[0, len)`.
    pub fn warp(&mut self, index: usize) -> Result<&T> {
        let slot = self.slot_at(index)?;
        self.current = Some(slot);
        self.value_of(slot)
            .ok_or(GeneticError::Index { index, len: self.len })
    }

    /// Returns the position of the cursor, counted from the head.
    pub fn cursor_position(&self) -> Option<usize> {
        let target = self.current?;
        self.slot_iter().position(|slot| slot == target)
    }

    /// Returns the value at position `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        let slot = self.slot_at(index).ok()?;
        self.value_of(slot)
    }

    /// Returns a mutable reference to the value at position `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let slot = self.slot_at(index).ok()?;
        self.slots
            .get_mut(slot)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    /// Iterates over the values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn value_of(&self, slot: usize) -> Option<&T> {
        self.node(slot).map(|node| &node.value)
    }

    fn set_next(&mut self, slot: usize, next: Option<usize>) {
        if let Some(node) = self.slots.get_mut(slot).and_then(Option::as_mut) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, slot: usize, prev: Option<usize>) {
        if let Some(node) = self.slots.get_mut(slot).and_then(Option::as_mut) {
            node.prev = prev;
        }
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn link_first(&mut self, value: T) -> usize {
        let slot = self.alloc(Node {
            value,
            prev: None,
            next: None,
        });
        self.head = Some(slot);
        self.tail = Some(slot);
        slot
    }

    fn link_after(&mut self, anchor: usize, value: T) -> usize {
        let next = self.node(anchor).and_then(|node| node.next);
        let slot = self.alloc(Node {
            value,
            prev: Some(anchor),
            next,
        });
        self.set_next(anchor, Some(slot));
        match next {
            Some(next) => self.set_prev(next, Some(slot)),
            None => self.tail = Some(slot),
        }
        slot
    }

    fn link_before(&mut self, anchor: usize, value: T) -> usize {
        let prev = self.node(anchor).and_then(|node| node.prev);
        let slot = self.alloc(Node {
            value,
            prev,
            next: Some(anchor),
        });
        self.set_prev(anchor, Some(slot));
        match prev {
            Some(prev) => self.set_next(prev, Some(slot)),
            None => self.head = Some(slot),
        }
        slot
    }

    fn slot_iter(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.head, move |&slot| self.node(slot)?.next)
    }

    /// Walks from whichever end is closer to `index`.
    fn slot_at(&self, index: usize) -> Result<usize> {
        let out_of_range = GeneticError::Index {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }

        let found = if index <= self.len / 2 {
            self.slot_iter().nth(index)
        } else {
            std::iter::successors(self.tail, |&slot| self.node(slot)?.prev)
                .nth(self.len - 1 - index)
        };
        found.ok_or(out_of_range)
    }
}

impl<T: Clone> OrderedList<T> {
    /// Copies the values, head to tail, into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> OrderedList<T> {
    /// Returns `true` if any value equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }

    /// Returns the position of the first value equal to `value`.
    pub fn position(&self, value: &T) -> Option<usize> {
        self.iter().position(|v| v == value)
    }
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for OrderedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for OrderedList<T> {}

impl<T: fmt::Debug> fmt::Debug for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = OrderedList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for OrderedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value, Location::Tail);
        }
    }
}

impl<T> IntoIterator for OrderedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut values = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            match self.slots.get_mut(slot).and_then(Option::take) {
                Some(node) => {
                    cursor = node.next;
                    values.push(node.value);
                }
                None => break,
            }
        }
        values.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over an [`OrderedList`].
pub struct Iter<'a, T> {
    slots: &'a [Option<Node<T>>],
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slots = self.slots;
        let node = slots.get(self.front?)?.as_ref()?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slots = self.slots;
        let node = slots.get(self.back?)?.as_ref()?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for OrderedList<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for OrderedList<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}
