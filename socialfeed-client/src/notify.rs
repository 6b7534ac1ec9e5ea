use socialfeed_common::model::notification::{Notification, NotificationId, Severity};
use std::{cell::RefCell, collections::BTreeMap, future::poll_fn, task::Poll, time::Duration};
use time::UtcDateTime;
use tokio::time::Instant;
use tokio_util::time::{DelayQueue, delay_queue::Key};
use tracing::debug;

pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);

/// Stack of transient notifications, each expiring on its own timer.
#[derive(Debug)]
pub struct Notifications {
    display_for: Duration,
    inner: RefCell<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_id: NotificationId,
    live: BTreeMap<NotificationId, Live>,
    expiry: DelayQueue<NotificationId>,
}

#[derive(Debug)]
struct Live {
    notification: Notification,
    key: Key,
    expires_at: Instant,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY)
    }
}

impl Notifications {
    #[must_use]
    pub fn new(display_for: Duration) -> Self {
        Self {
            display_for,
            inner: RefCell::new(Inner {
                next_id: NotificationId::new(1),
                live: BTreeMap::new(),
                expiry: DelayQueue::new(),
            }),
        }
    }

    #[must_use]
    pub fn display_for(&self) -> Duration {
        self.display_for
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let mut inner = self.inner.borrow_mut();

        let id = inner.next_id;
        inner.next_id = id.next();

        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: UtcDateTime::now(),
        };
        debug!(%id, %severity, message = %notification.message, "Showing notification");

        let key = inner.expiry.insert(id, self.display_for);
        inner.live.insert(
            id,
            Live {
                notification,
                key,
                expires_at: Instant::now() + self.display_for,
            },
        );

        id
    }

    pub fn dismiss(&self, id: NotificationId) -> Option<Notification> {
        let mut inner = self.inner.borrow_mut();

        let live = inner.live.remove(&id)?;
        inner.expiry.remove(&live.key);
        debug!(%id, "Dismissed notification");

        Some(live.notification)
    }

    /// Notifications still on display, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        self.inner
            .borrow()
            .live
            .values()
            .filter(|live| live.expires_at > now)
            .map(|live| live.notification.clone())
            .collect()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().live.is_empty()
    }

    /// Waits for the next notification to expire and removes it.
    ///
    /// Resolves to `None` right away if nothing is on display.
    pub async fn next_expired(&self) -> Option<Notification> {
        poll_fn(|cx| {
            let mut inner = self.inner.borrow_mut();
            loop {
                match inner.expiry.poll_expired(cx) {
                    Poll::Ready(Some(expired)) => {
                        if let Some(live) = inner.live.remove(expired.get_ref()) {
                            return Poll::Ready(Some(live.notification));
                        }
                    }
                    Poll::Ready(None) => return Poll::Ready(None),
                    Poll::Pending => return Poll::Pending,
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::notify::Notifications;
    use socialfeed_common::model::notification::Severity;
    use std::time::Duration;
    use tokio::time::{Instant, advance};

    fn assert_elapsed(start: Instant, millis: u64) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(millis) && elapsed < Duration::from_millis(millis + 5),
            "{elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_stack_and_expire_independently() {
        let notifications = Notifications::new(Duration::from_millis(3000));
        let start = Instant::now();

        let first = notifications.notify("Post created successfully!", Severity::Success);
        advance(Duration::from_millis(1000)).await;
        let second = notifications.notify("Please enter a comment", Severity::Warning);

        let active = notifications.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, first);
        assert_eq!(active[1].id, second);
        assert_eq!(active[1].severity, Severity::Warning);

        let expired = notifications.next_expired().await.unwrap();
        assert_eq!(expired.id, first);
        assert_elapsed(start, 3000);
        assert_eq!(notifications.active().len(), 1);

        let expired = notifications.next_expired().await.unwrap();
        assert_eq!(expired.id, second);
        assert_elapsed(start, 4000);

        assert!(!notifications.has_pending());
        assert!(notifications.next_expired().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_notifications_never_expire() {
        let notifications = Notifications::new(Duration::from_millis(3000));

        let dismissed = notifications.notify("Failed to like post", Severity::Error);
        let kept = notifications.notify("Reacted with wow!", Severity::Success);

        assert_eq!(
            notifications.dismiss(dismissed).unwrap().message,
            "Failed to like post"
        );
        assert!(notifications.dismiss(dismissed).is_none());

        let expired = notifications.next_expired().await.unwrap();
        assert_eq!(expired.id, kept);
        assert!(notifications.next_expired().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique() {
        let notifications = Notifications::default();

        let ids: Vec<_> = (0..5)
            .map(|i| notifications.notify(format!("message {i}"), Severity::Info))
            .collect();

        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
        assert_eq!(notifications.active().len(), 5);
    }
}
