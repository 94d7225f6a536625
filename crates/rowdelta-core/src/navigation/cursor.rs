//! Cursor state shared by every navigator.
//!
//! A [`CursorState`] hands out the element at an index at most once: later
//! navigation to the same index returns the same `Rc`. A
//! [`TwoPointCursor`] does the same for the start point / end point pair
//! of a change.

use crate::errors::{DeltaError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Forward cursor with memoized elements.
///
/// `next_index` only moves through [`CursorState::next_with`]. A failed
/// navigation (out of bounds or failing builder) leaves the state as it
/// was.
#[derive(Debug)]
pub struct CursorState<T> {
    next_index: Cell<usize>,
    issued: RefCell<BTreeMap<usize, Rc<T>>>,
}

impl<T> Default for CursorState<T> {
    fn default() -> Self {
        Self {
            next_index: Cell::new(0),
            issued: RefCell::new(BTreeMap::new()),
        }
    }
}

impl<T> CursorState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next call to `next_with` navigates to
    pub fn next_index(&self) -> usize {
        self.next_index.get()
    }

    /// Element already issued at `index`, if any
    pub fn cached(&self, index: usize) -> Option<Rc<T>> {
        self.issued.borrow().get(&index).cloned()
    }

    /// Indexes issued so far, ascending
    pub fn issued_indexes(&self) -> Vec<usize> {
        self.issued.borrow().keys().copied().collect()
    }

    /// Element at `next_index`, then advance.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` over `[0, size)` named `what`, or the builder's
    /// error.
    pub fn next_with<F>(&self, what: &str, size: usize, build: F) -> Result<Rc<T>>
    where
        F: FnOnce(usize) -> Result<Rc<T>>,
    {
        let index = self.next_index.get();
        let element = self.at_with(what, index, size, build)?;
        self.next_index.set(index + 1);
        Ok(element)
    }

    /// Element at `index`, built on first visit. Does not move
    /// `next_index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` over `[0, size)` named `what`, or the builder's
    /// error.
    pub fn at_with<F>(&self, what: &str, index: usize, size: usize, build: F) -> Result<Rc<T>>
    where
        F: FnOnce(usize) -> Result<Rc<T>>,
    {
        if index >= size {
            return Err(DeltaError::index_out_of_range(what, index, size));
        }
        if let Some(hit) = self.cached(index) {
            return Ok(hit);
        }
        let element = build(index)?;
        self.issued.borrow_mut().insert(index, Rc::clone(&element));
        Ok(element)
    }
}

/// The two points in time of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Point {
    Start,
    End,
}

impl Point {
    pub fn as_str(&self) -> &'static str {
        match self {
            Point::Start => "start point",
            Point::End => "end point",
        }
    }
}

/// One memoized slot per point in time.
///
/// An empty slot means "not navigated yet"; whether the element itself
/// stands for an absent row is the element's business.
#[derive(Debug)]
pub struct TwoPointCursor<T> {
    start: RefCell<Option<Rc<T>>>,
    end: RefCell<Option<Rc<T>>>,
}

impl<T> Default for TwoPointCursor<T> {
    fn default() -> Self {
        Self {
            start: RefCell::new(None),
            end: RefCell::new(None),
        }
    }
}

impl<T> TwoPointCursor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, point: Point) -> &RefCell<Option<Rc<T>>> {
        match point {
            Point::Start => &self.start,
            Point::End => &self.end,
        }
    }

    pub fn is_loaded(&self, point: Point) -> bool {
        self.slot(point).borrow().is_some()
    }

    /// Element at `point`, built on first visit
    ///
    /// # Errors
    ///
    /// The builder's error; the slot stays empty.
    pub fn at_with<F>(&self, point: Point, build: F) -> Result<Rc<T>>
    where
        F: FnOnce(Point) -> Result<T>,
    {
        if let Some(hit) = self.slot(point).borrow().as_ref() {
            return Ok(Rc::clone(hit));
        }
        let element = Rc::new(build(point)?);
        *self.slot(point).borrow_mut() = Some(Rc::clone(&element));
        Ok(element)
    }

    /// Infallible form of [`TwoPointCursor::at_with`]
    pub fn get_or_build<F>(&self, point: Point, build: F) -> Rc<T>
    where
        F: FnOnce(Point) -> T,
    {
        if let Some(hit) = self.slot(point).borrow().as_ref() {
            return Rc::clone(hit);
        }
        let element = Rc::new(build(point));
        *self.slot(point).borrow_mut() = Some(Rc::clone(&element));
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(i: usize) -> Result<Rc<String>> {
        Ok(Rc::new(format!("element {}", i)))
    }

    #[test]
    fn test_next_walks_then_fails() {
        let cursor: CursorState<String> = CursorState::new();
        for expected in 0..3 {
            let e = cursor.next_with("rows", 3, build).unwrap();
            assert_eq!(*e, format!("element {}", expected));
        }
        let err = cursor.next_with("rows", 3, build).unwrap_err();
        assert_eq!(err, DeltaError::index_out_of_range("rows", 3, 3));
        assert_eq!(cursor.next_index(), 3);
    }

    #[test]
    fn test_at_is_memoized_and_does_not_advance() {
        let cursor: CursorState<String> = CursorState::new();
        let a = cursor.at_with("rows", 1, 3, build).unwrap();
        let b = cursor.at_with("rows", 1, 3, build).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cursor.next_index(), 0);

        cursor.next_with("rows", 3, build).unwrap();
        let c = cursor.next_with("rows", 3, build).unwrap();
        assert!(Rc::ptr_eq(&a, &c));
        assert_eq!(cursor.issued_indexes(), vec![0, 1]);
    }

    #[test]
    fn test_failures_leave_state_unchanged() {
        let cursor: CursorState<String> = CursorState::new();
        assert!(cursor.at_with("rows", 5, 3, build).is_err());
        let failing = |_: usize| -> Result<Rc<String>> { Err(DeltaError::invalid_argument("boom")) };
        assert!(cursor.next_with("rows", 3, failing).is_err());
        assert_eq!(cursor.next_index(), 0);
        assert!(cursor.cached(0).is_none());
    }

    #[test]
    fn test_two_point_slots_are_independent() {
        let cursor: TwoPointCursor<&'static str> = TwoPointCursor::new();
        assert!(!cursor.is_loaded(Point::Start));
        let start = cursor.at_with(Point::Start, |_| Ok("before")).unwrap();
        let again = cursor.at_with(Point::Start, |_| Ok("other")).unwrap();
        assert!(Rc::ptr_eq(&start, &again));
        assert!(!cursor.is_loaded(Point::End));
        let end = cursor.at_with(Point::End, |p| Ok(p.as_str())).unwrap();
        assert_eq!(*end, "end point");
    }
}
