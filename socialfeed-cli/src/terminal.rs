use socialfeed_client::view::{ControlId, MemoryView, View};
use socialfeed_common::model::{
    Id,
    news::NewsFeed,
    notification::{Notification, NotificationId},
    post::PostMarker,
};
use socialfeed_common::util::time_ago;
use std::{cell::Cell, fmt::Write, io, path::PathBuf, time::Duration};
use time::UtcDateTime;
use tracing::{debug, warn};

/// Prints view changes to stdout while keeping the state in a [`MemoryView`].
#[derive(Debug)]
pub struct TerminalView {
    state: MemoryView,
    draft_file: Option<PathBuf>,
    shown_up_to: Cell<NotificationId>,
}

impl TerminalView {
    #[must_use]
    pub fn new(draft_file: Option<PathBuf>) -> Self {
        Self {
            state: MemoryView::default(),
            draft_file,
            shown_up_to: Cell::new(NotificationId::default()),
        }
    }

    #[must_use]
    pub fn state(&self) -> &MemoryView {
        &self.state
    }

    pub fn take_reload(&self) -> Option<Duration> {
        self.state.take_reload()
    }

    /// Prints the notifications that appeared since the last call.
    pub fn show_new(&self, active: &[Notification]) {
        for notification in active {
            if notification.id > self.shown_up_to.get() {
                println!("{}", render_notification(notification));
                self.shown_up_to.set(notification.id);
            }
        }
    }

    pub fn show_expired(&self, notification: &Notification) {
        debug!(id = %notification.id, "Notification expired");
        println!("  (#{} faded)", notification.id);
    }
}

impl View for TerminalView {
    fn set_loading(&self, control: &ControlId, loading: bool) {
        debug!(%control, loading, "Loading state changed");
        self.state.set_loading(control, loading);
    }

    fn clear_input(&self, control: &ControlId) {
        self.state.clear_input(control);
    }

    fn label(&self, control: &ControlId) -> Option<String> {
        self.state.label(control)
    }

    fn set_label(&self, control: &ControlId, label: &str) {
        self.state.set_label(control, label);
    }

    fn set_like_count(&self, post: &Id<PostMarker>, text: &str) {
        println!("  {post}: {text}");
        self.state.set_like_count(post, text);
    }

    fn animate(&self, control: &ControlId) {
        if let Some(label) = self.state.label(control) {
            println!("  [{label}]");
        }
        self.state.animate(control);
    }

    fn schedule_reload(&self, after: Duration) {
        debug!(?after, "Reload scheduled");
        self.state.schedule_reload(after);
    }

    fn take_draft(&self) -> Option<String> {
        let path = self.draft_file.as_deref()?;

        let draft = match std::fs::read_to_string(path) {
            Ok(draft) => draft,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Could not read shared draft");
                return None;
            }
        };
        if let Err(e) = std::fs::remove_file(path) {
            warn!(error = %e, path = %path.display(), "Could not remove shared draft");
        }

        Some(draft.trim().to_owned()).filter(|draft| !draft.is_empty())
    }

    fn fill_composer(&self, text: &str) {
        println!("Draft restored: {text}");
        self.state.fill_composer(text);
    }
}

#[must_use]
pub fn render_notification(notification: &Notification) -> String {
    format!(
        "#{} [{}] {}",
        notification.id, notification.severity, notification.message
    )
}

#[must_use]
pub fn render_feed(feed: &NewsFeed, now: UtcDateTime) -> String {
    let mut out = String::new();

    if let Some(error) = &feed.error {
        let _ = writeln!(out, "{}: {error}", feed.category);
        return out;
    }

    let _ = writeln!(out, "{} ({} results)", feed.category, feed.total_results);
    for article in &feed.articles {
        let age = article
            .published()
            .map_or_else(String::new, |published| format!(", {}", time_ago(published, now)));
        let _ = writeln!(out, "- {} ({}{age})", article.title, article.source);
    }

    out
}
