//! Root of change navigation and its filtered views.

use super::change_nav::ChangeNavigator;
use super::cursor::CursorState;
use crate::diff::{ChangeFilter, Changes};
use crate::errors::Result;
use crate::model::ChangeType;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

/// Navigates the changes computed between a start point and an end point.
///
/// Every change is wrapped once: the same position reached through any
/// view, or through a primary key lookup, yields the same
/// [`ChangeNavigator`]. Each filter owns one cursor for the lifetime of
/// the navigator.
#[derive(Debug)]
pub struct ChangesNavigator {
    changes: Changes,
    issued: RefCell<BTreeMap<usize, Rc<ChangeNavigator>>>,
    cursors: RefCell<BTreeMap<ChangeFilter, Rc<CursorState<ChangeNavigator>>>>,
}

impl ChangesNavigator {
    pub fn new(changes: Changes) -> Self {
        Self {
            changes,
            issued: RefCell::new(BTreeMap::new()),
            cursors: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn changes(&self) -> &Changes {
        &self.changes
    }

    /// Cursor of `filter`, if that filter was navigated already
    pub fn cursor_state(&self, filter: &ChangeFilter) -> Option<Rc<CursorState<ChangeNavigator>>> {
        self.cursors.borrow().get(filter).cloned()
    }

    fn cursor(&self, filter: &ChangeFilter) -> Rc<CursorState<ChangeNavigator>> {
        Rc::clone(
            self.cursors
                .borrow_mut()
                .entry(filter.clone())
                .or_insert_with(|| Rc::new(CursorState::new())),
        )
    }

    fn navigator_at(&self, position: usize) -> Rc<ChangeNavigator> {
        if let Some(hit) = self.issued.borrow().get(&position) {
            return Rc::clone(hit);
        }
        let change = Arc::clone(&self.changes.all()[position]);
        let navigator = Rc::new(ChangeNavigator::new(change, position));
        self.issued
            .borrow_mut()
            .insert(position, Rc::clone(&navigator));
        navigator
    }

    /// View over the changes selected by `filter`
    ///
    /// # Errors
    ///
    /// `NotFound` when the filter names a table that is not tracked.
    pub fn view(&self, filter: ChangeFilter) -> Result<ChangesView<'_>> {
        let size = self.changes.count(&filter)?;
        Ok(ChangesView {
            root: self,
            filter,
            size,
        })
    }

    fn unchecked_view(&self, filter: ChangeFilter) -> ChangesView<'_> {
        let size = self.changes.count(&filter).unwrap_or_default();
        ChangesView {
            root: self,
            filter,
            size,
        }
    }

    pub fn of_all(&self) -> ChangesView<'_> {
        self.unchecked_view(ChangeFilter::all())
    }

    pub fn of_type(&self, change_type: ChangeType) -> ChangesView<'_> {
        self.unchecked_view(ChangeFilter::of_type(change_type))
    }

    pub fn of_creation(&self) -> ChangesView<'_> {
        self.of_type(ChangeType::Creation)
    }

    pub fn of_modification(&self) -> ChangesView<'_> {
        self.of_type(ChangeType::Modification)
    }

    pub fn of_deletion(&self) -> ChangesView<'_> {
        self.of_type(ChangeType::Deletion)
    }

    /// # Errors
    ///
    /// `NotFound` for an untracked table.
    pub fn on_table(&self, table: &str) -> Result<ChangesView<'_>> {
        self.view(ChangeFilter::on_table(table))
    }

    /// # Errors
    ///
    /// `NotFound` for an untracked table.
    pub fn of_creation_on_table(&self, table: &str) -> Result<ChangesView<'_>> {
        self.view(ChangeFilter::of_type_on_table(ChangeType::Creation, table))
    }

    /// # Errors
    ///
    /// `NotFound` for an untracked table.
    pub fn of_modification_on_table(&self, table: &str) -> Result<ChangesView<'_>> {
        self.view(ChangeFilter::of_type_on_table(
            ChangeType::Modification,
            table,
        ))
    }

    /// # Errors
    ///
    /// `NotFound` for an untracked table.
    pub fn of_deletion_on_table(&self, table: &str) -> Result<ChangesView<'_>> {
        self.view(ChangeFilter::of_type_on_table(ChangeType::Deletion, table))
    }

    /// Next change of the unfiltered list
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` past the last change.
    pub fn change(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_all().change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the unfiltered list.
    pub fn change_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_all().change_at(index)
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last creation.
    pub fn change_of_creation(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_creation().change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the creations.
    pub fn change_of_creation_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_creation().change_at(index)
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last modification.
    pub fn change_of_modification(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_modification().change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the modifications.
    pub fn change_of_modification_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_modification().change_at(index)
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last deletion.
    pub fn change_of_deletion(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_deletion().change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the deletions.
    pub fn change_of_deletion_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_deletion().change_at(index)
    }

    /// The change on `table` with primary key `pk_values`.
    ///
    /// Returns the same navigator as the index navigation reaching that
    /// change. No cursor moves.
    ///
    /// # Errors
    ///
    /// `NotFound` for an untracked table or an unknown key.
    pub fn change_on_table_with_pks(
        &self,
        table: &str,
        pk_values: &[Value],
    ) -> Result<Rc<ChangeNavigator>> {
        let (position, _) = self.changes.find_by_pk(table, pk_values)?;
        self.change_at(position)
    }
}

/// The changes selected by one filter
#[derive(Debug, Clone)]
pub struct ChangesView<'a> {
    root: &'a ChangesNavigator,
    filter: ChangeFilter,
    size: usize,
}

impl<'a> ChangesView<'a> {
    pub fn filter(&self) -> &ChangeFilter {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn build(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        let position = self.root.changes.position_of(&self.filter, index)?;
        Ok(self.root.navigator_at(position))
    }

    /// Next change of this view
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` past the last selected change.
    pub fn change(&self) -> Result<Rc<ChangeNavigator>> {
        let what = self.filter.to_string();
        self.root
            .cursor(&self.filter)
            .next_with(&what, self.size, |i| self.build(i))
    }

    /// Change at `index` of this view
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` outside `[0, len)`.
    pub fn change_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        let what = self.filter.to_string();
        self.root
            .cursor(&self.filter)
            .at_with(&what, index, self.size, |i| self.build(i))
    }

    /// This view restricted to `change_type`
    pub fn of_type(&self, change_type: ChangeType) -> ChangesView<'a> {
        self.root.unchecked_view(self.filter.with_type(change_type))
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last creation of this view.
    pub fn change_of_creation(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_type(ChangeType::Creation).change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the creations of this view.
    pub fn change_of_creation_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_type(ChangeType::Creation).change_at(index)
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last modification of this view.
    pub fn change_of_modification(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_type(ChangeType::Modification).change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the modifications of this view.
    pub fn change_of_modification_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_type(ChangeType::Modification).change_at(index)
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last deletion of this view.
    pub fn change_of_deletion(&self) -> Result<Rc<ChangeNavigator>> {
        self.of_type(ChangeType::Deletion).change()
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the deletions of this view.
    pub fn change_of_deletion_at(&self, index: usize) -> Result<Rc<ChangeNavigator>> {
        self.of_type(ChangeType::Deletion).change_at(index)
    }
}
