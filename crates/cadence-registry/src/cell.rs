//! Shared state variable handles.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A shared handle to a single state variable.
///
/// The publishing component keeps one handle and hands the registry a
/// clone, so the ownership question the original raw-pointer design
/// left to discipline ("the publisher must outlive the registry's use")
/// is settled structurally: the value lives as long as any handle.
///
/// Cloning clones the handle, not the value. Interior mutability is
/// single-threaded (`Rc<RefCell>`), matching the kernel's one logical
/// thread of control.
#[derive(PartialEq)]
pub struct StateCell<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> StateCell<T> {
    /// A new cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }

    /// Replace the value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.inner.replace(value)
    }

    /// Immutably borrow the value.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Mutably borrow the value.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Whether two handles refer to the same variable.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn shared(&self) -> Rc<RefCell<T>> {
        Rc::clone(&self.inner)
    }

    pub(crate) fn from_shared(inner: Rc<RefCell<T>>) -> Self {
        Self { inner }
    }
}

impl<T: Copy> StateCell<T> {
    /// Copy the current value out.
    pub fn get(&self) -> T {
        *self.inner.borrow()
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateCell").field(&*self.inner.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_alias_the_same_value() {
        let a = StateCell::new(1.0_f64);
        let b = a.clone();
        b.set(7.0);
        assert_eq!(a.get(), 7.0);
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn distinct_cells_are_not_ptr_eq() {
        let a = StateCell::new(0_u32);
        let b = StateCell::new(0_u32);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn replace_returns_previous() {
        let cell = StateCell::new("old".to_string());
        assert_eq!(cell.replace("new".to_string()), "old");
        assert_eq!(&*cell.borrow(), "new");
    }
}
