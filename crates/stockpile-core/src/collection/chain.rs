//! # Chain
//!
//! Singly-linked storage for the bounded collection.
//!
//! All list walking lives here. Callers locate a `Position` with `find` or
//! `seek_last`, then edit at that position with `insert_after` / `remove_at`.
//! Positions are only valid until the next edit.

use std::fmt;

type Link<T> = Option<Box<Slot<T>>>;

struct Slot<T> {
    value: T,
    next: Link<T>,
}

/// Zero-based offset of a slot, counted from the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position(usize);

pub(crate) struct Chain<T> {
    head: Link<T>,
    len: usize,
}

impl<T> Chain<T> {
    pub(crate) fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// First position whose value satisfies `pred`.
    pub(crate) fn find(&self, pred: impl FnMut(&T) -> bool) -> Option<Position> {
        self.iter().position(pred).map(Position)
    }

    /// Last position of the leading run of values satisfying `pred`.
    ///
    /// `None` when the head already fails `pred` (or the chain is empty).
    pub(crate) fn seek_last(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Position> {
        let run = self.iter().take_while(|value| pred(value)).count();
        run.checked_sub(1).map(Position)
    }

    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.link_at(pos.0)?.as_mut().map(|slot| &mut slot.value)
    }

    /// Insert `value` after `pos`, or at the head when `pos` is `None`.
    pub(crate) fn insert_after(&mut self, pos: Option<Position>, value: T) -> Position {
        let index = pos.map_or(0, |Position(at)| at + 1).min(self.len);
        if let Some(link) = self.link_at(index) {
            let next = link.take();
            *link = Some(Box::new(Slot { value, next }));
            self.len += 1;
        }
        Position(index)
    }

    /// Unlink the slot at `pos` and return its value.
    pub(crate) fn remove_at(&mut self, pos: Position) -> Option<T> {
        let link = self.link_at(pos.0)?;
        let slot = link.take()?;
        let Slot { value, next } = *slot;
        *link = next;
        self.len -= 1;
        Some(value)
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// The link that owns slot `index` (`index == len` is the tail link).
    fn link_at(&mut self, index: usize) -> Option<&mut Link<T>> {
        let mut link = &mut self.head;
        for _ in 0..index {
            link = &mut link.as_mut()?.next;
        }
        Some(link)
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Chain<T> {
    // Iterative, so long chains cannot overflow the stack.
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut slot) = link {
            link = slot.next.take();
        }
    }
}

impl<T: Clone> Clone for Chain<T> {
    fn clone(&self) -> Self {
        let values: Vec<&T> = self.iter().collect();
        let mut chain = Self::new();
        for value in values.into_iter().rev() {
            chain.insert_after(None, value.clone());
        }
        chain
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// ITERATOR
// =============================================================================

pub(crate) struct Iter<'a, T> {
    next: Option<&'a Slot<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let slot = self.next?;
        self.next = slot.next.as_deref();
        Some(&slot.value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
