//! A list that notifies subscribers when it changes.
//!
//! Items are stored as `Rc<T>`, so a snapshot is a cheap clone of pointers
//! and observers never hold a borrow of the list while they run. Observers
//! may mutate the list they observe; the nested change is delivered after the
//! current one.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use consolegrid::observe::ObservableList;
//!
//! let list = ObservableList::new();
//! let seen = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&seen);
//! let subscription = list.subscribe(move |_, snapshot| counter.set(snapshot.len()));
//!
//! list.push("a");
//! list.push("b");
//! assert_eq!(seen.get(), 2);
//!
//! drop(subscription);
//! list.push("c");
//! assert_eq!(seen.get(), 2);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// What changed in an [`ObservableList`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListChange {
    /// `count` items were inserted starting at `index`.
    Added { index: usize, count: usize },
    /// The item at `index` was removed.
    Removed { index: usize },
    /// The item at `index` was replaced.
    Replaced { index: usize },
    /// The whole content changed.
    Reset,
}

type Observer<T> = Rc<dyn Fn(&ListChange, &[Rc<T>])>;

struct ListInner<T> {
    items: RefCell<Vec<Rc<T>>>,
    observers: RefCell<Vec<(u64, Observer<T>)>>,
    next_id: Cell<u64>,
}

/// A shared, observable list of records.
///
/// Cloning the list clones the handle, not the items.
pub struct ObservableList<T> {
    inner: Rc<ListInner<T>>,
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        ObservableList {
            inner: Rc::new(ListInner {
                items: RefCell::new(Vec::new()),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rc<T>> {
        self.inner.items.borrow().get(index).cloned()
    }

    /// The current items.
    pub fn snapshot(&self) -> Vec<Rc<T>> {
        self.inner.items.borrow().clone()
    }

    pub fn push(&self, item: T) {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            items.push(Rc::new(item));
            items.len() - 1
        };
        self.notify(ListChange::Added { index, count: 1 });
    }

    /// Inserts `item` at `index`, clamped to the end of the list.
    pub fn insert(&self, index: usize, item: T) {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, Rc::new(item));
            index
        };
        self.notify(ListChange::Added { index, count: 1 });
    }

    /// Appends all items with a single notification.
    pub fn extend<I: IntoIterator<Item = T>>(&self, items: I) {
        let (index, count) = {
            let mut list = self.inner.items.borrow_mut();
            let index = list.len();
            list.extend(items.into_iter().map(Rc::new));
            (index, list.len() - index)
        };
        if count > 0 {
            self.notify(ListChange::Added { index, count });
        }
    }

    pub fn remove(&self, index: usize) -> Option<Rc<T>> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.notify(ListChange::Removed { index });
        }
        removed
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn replace(&self, index: usize, item: T) -> Option<Rc<T>> {
        let previous = {
            let mut items = self.inner.items.borrow_mut();
            items
                .get_mut(index)
                .map(|slot| std::mem::replace(slot, Rc::new(item)))
        };
        if previous.is_some() {
            self.notify(ListChange::Replaced { index });
        }
        previous
    }

    pub fn clear(&self) {
        self.inner.items.borrow_mut().clear();
        self.notify(ListChange::Reset);
    }

    /// Replaces the whole content with a single notification.
    pub fn reset<I: IntoIterator<Item = T>>(&self, items: I) {
        *self.inner.items.borrow_mut() = items.into_iter().map(Rc::new).collect();
        self.notify(ListChange::Reset);
    }

    /// Registers `observer` until the returned guard is dropped.
    #[must_use = "the observer is removed when the subscription is dropped"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription<T>
    where
        F: Fn(&ListChange, &[Rc<T>]) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        Subscription {
            list: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Whether both handles point at the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, change: ListChange) {
        let snapshot = self.snapshot();
        let observers: Vec<Observer<T>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(&change, &snapshot);
        }
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        ObservableList {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let list = ObservableList::new();
        *list.inner.items.borrow_mut() = iter.into_iter().map(Rc::new).collect();
        list
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("len", &self.len())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
pub struct Subscription<T> {
    list: Weak<ListInner<T>>,
    id: u64,
}

impl<T> Subscription<T> {
    /// Whether the observed list still exists.
    pub fn is_active(&self) -> bool {
        self.list.strong_count() > 0
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.observers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(list: &ObservableList<u32>) -> (Subscription<u32>, Rc<RefCell<Vec<ListChange>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let subscription = list.subscribe(move |change, _| sink.borrow_mut().push(change.clone()));
        (subscription, changes)
    }

    #[test]
    fn mutations_emit_changes() {
        let list: ObservableList<u32> = vec![1, 2, 3].into();
        let (_subscription, changes) = recorder(&list);

        list.push(4);
        list.insert(0, 0);
        list.remove(1);
        list.replace(0, 9);
        list.clear();

        assert_eq!(
            *changes.borrow(),
            vec![
                ListChange::Added { index: 3, count: 1 },
                ListChange::Added { index: 0, count: 1 },
                ListChange::Removed { index: 1 },
                ListChange::Replaced { index: 0 },
                ListChange::Reset,
            ]
        );
    }

    #[test]
    fn out_of_range_mutations_are_silent() {
        let list: ObservableList<u32> = vec![1].into();
        let (_subscription, changes) = recorder(&list);
        assert!(list.remove(5).is_none());
        assert!(list.replace(5, 1).is_none());
        list.extend(Vec::new());
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn observer_sees_snapshot_after_change() {
        let list = ObservableList::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = list.subscribe(move |_, snapshot: &[Rc<u32>]| {
            *sink.borrow_mut() = snapshot.iter().map(|v| **v).collect();
        });
        list.extend([1, 2]);
        list.push(3);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let list: ObservableList<u32> = ObservableList::new();
        let (subscription, changes) = recorder(&list);
        assert_eq!(list.observer_count(), 1);
        drop(subscription);
        assert_eq!(list.observer_count(), 0);
        list.push(1);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn observer_may_mutate_the_list() {
        let list: ObservableList<u32> = ObservableList::new();
        let handle = list.clone();
        let _subscription = list.subscribe(move |change, _| {
            if let ListChange::Added { index: 0, .. } = change {
                handle.push(99);
            }
        });
        list.push(1);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).as_deref(), Some(&99));
    }

    #[test]
    fn subscription_outliving_list_is_inactive() {
        let list: ObservableList<u32> = ObservableList::new();
        let (subscription, _) = recorder(&list);
        assert!(subscription.is_active());
        drop(list);
        assert!(!subscription.is_active());
    }
}
