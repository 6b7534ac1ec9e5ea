//! Guards shared by every mutating action.
//!
//! An action first takes its [`ActionKey`] out of the [`InFlight`] set, then marks its control
//! as [`Loading`]. Both guards undo themselves on drop, so every exit path of a handler releases
//! the key and clears the loading state.

use crate::view::{ControlId, View};
use socialfeed_common::model::{Id, post::PostMarker};
use std::{cell::RefCell, collections::HashSet};

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum ActionKey {
    CreatePost,
    ToggleLike(Id<PostMarker>),
    React(Id<PostMarker>),
    AddComment(Id<PostMarker>),
}

#[derive(Debug, Default)]
pub struct InFlight {
    keys: RefCell<HashSet<ActionKey>>,
}

impl InFlight {
    /// Returns `None` if `key` is already held by a request that has not settled yet.
    #[must_use]
    pub fn acquire(&self, key: ActionKey) -> Option<InFlightToken<'_>> {
        if !self.keys.borrow_mut().insert(key.clone()) {
            return None;
        }

        Some(InFlightToken { set: self, key })
    }

    #[must_use]
    pub fn contains(&self, key: &ActionKey) -> bool {
        self.keys.borrow().contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.borrow().is_empty()
    }
}

#[derive(Debug)]
pub struct InFlightToken<'a> {
    set: &'a InFlight,
    key: ActionKey,
}

impl InFlightToken<'_> {
    #[must_use]
    pub fn key(&self) -> &ActionKey {
        &self.key
    }
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.set.keys.borrow_mut().remove(&self.key);
    }
}

pub struct Loading<'a, V: View + ?Sized> {
    view: &'a V,
    control: &'a ControlId,
}

impl<'a, V: View + ?Sized> Loading<'a, V> {
    #[must_use]
    pub fn start(view: &'a V, control: &'a ControlId) -> Self {
        view.set_loading(control, true);
        Self { view, control }
    }
}

impl<V: View + ?Sized> Drop for Loading<'_, V> {
    fn drop(&mut self) {
        self.view.set_loading(self.control, false);
    }
}
