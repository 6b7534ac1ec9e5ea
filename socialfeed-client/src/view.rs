use socialfeed_common::model::{Id, post::PostMarker};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    rc::Rc,
    time::Duration,
};

/// Identifies the control (button or form) an action was triggered from.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ControlId(String);

impl ControlId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ControlId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ControlId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The UI state the dispatcher drives.
pub trait View {
    fn set_loading(&self, control: &ControlId, loading: bool);

    /// Clears the text input belonging to `control`.
    fn clear_input(&self, control: &ControlId);

    fn label(&self, control: &ControlId) -> Option<String>;

    fn set_label(&self, control: &ControlId, label: &str);

    fn set_like_count(&self, post: &Id<PostMarker>, text: &str);

    fn animate(&self, control: &ControlId);

    /// Requests a full resynchronisation from the server once `after` has passed.
    fn schedule_reload(&self, after: Duration);

    /// Removes and returns a draft handed over from another page, if any.
    fn take_draft(&self) -> Option<String>;

    fn fill_composer(&self, text: &str);
}

pub const COMPOSER: &str = "postContent";

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ViewState {
    pub loading: BTreeSet<ControlId>,
    pub labels: BTreeMap<ControlId, String>,
    pub inputs: BTreeMap<ControlId, String>,
    pub like_counts: BTreeMap<Id<PostMarker>, String>,
    pub animated: Vec<ControlId>,
    pub reload: Option<Duration>,
    pub draft: Option<String>,
}

/// A [`View`] kept entirely in memory. Clones share the same state.
#[derive(Clone, Debug)]
pub struct MemoryView {
    composer: ControlId,
    state: Rc<RefCell<ViewState>>,
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new(ControlId::new(COMPOSER))
    }
}

impl MemoryView {
    #[must_use]
    pub fn new(composer: ControlId) -> Self {
        Self {
            composer,
            state: Rc::default(),
        }
    }

    #[must_use]
    pub fn composer(&self) -> &ControlId {
        &self.composer
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_loading(&self, control: &ControlId) -> bool {
        self.state.borrow().loading.contains(control)
    }

    #[must_use]
    pub fn input(&self, control: &ControlId) -> Option<String> {
        self.state.borrow().inputs.get(control).cloned()
    }

    pub fn set_input(&self, control: &ControlId, text: impl Into<String>) {
        self.state
            .borrow_mut()
            .inputs
            .insert(control.clone(), text.into());
    }

    #[must_use]
    pub fn like_count(&self, post: &Id<PostMarker>) -> Option<String> {
        self.state.borrow().like_counts.get(post).cloned()
    }

    #[must_use]
    pub fn reload(&self) -> Option<Duration> {
        self.state.borrow().reload
    }

    pub fn take_reload(&self) -> Option<Duration> {
        self.state.borrow_mut().reload.take()
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.state.borrow_mut().draft = Some(draft.into());
    }
}

impl View for MemoryView {
    fn set_loading(&self, control: &ControlId, loading: bool) {
        let mut state = self.state.borrow_mut();
        if loading {
            state.loading.insert(control.clone());
        } else {
            state.loading.remove(control);
        }
    }

    fn clear_input(&self, control: &ControlId) {
        self.state.borrow_mut().inputs.remove(control);
    }

    fn label(&self, control: &ControlId) -> Option<String> {
        self.state.borrow().labels.get(control).cloned()
    }

    fn set_label(&self, control: &ControlId, label: &str) {
        self.state
            .borrow_mut()
            .labels
            .insert(control.clone(), label.to_owned());
    }

    fn set_like_count(&self, post: &Id<PostMarker>, text: &str) {
        self.state
            .borrow_mut()
            .like_counts
            .insert(post.clone(), text.to_owned());
    }

    fn animate(&self, control: &ControlId) {
        self.state.borrow_mut().animated.push(control.clone());
    }

    fn schedule_reload(&self, after: Duration) {
        let mut state = self.state.borrow_mut();
        state.reload = Some(state.reload.map_or(after, |pending| pending.min(after)));
    }

    fn take_draft(&self) -> Option<String> {
        self.state.borrow_mut().draft.take()
    }

    fn fill_composer(&self, text: &str) {
        let composer = self.composer.clone();
        self.set_input(&composer, text);
    }
}
