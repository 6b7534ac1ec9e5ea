use crate::{
    Result,
    api::Api,
    lifecycle::{ActionKey, InFlight, Loading},
    notify::{DEFAULT_DISPLAY, Notifications},
    view::{ControlId, View},
};
use socialfeed_common::model::{
    Id,
    envelope::Settled,
    notification::Severity,
    post::{Content, PostMarker, Reaction},
};
use std::{collections::HashMap, time::Duration};
use tracing::{debug, error, warn};

pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(1000);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum ActionKind {
    CreatePost,
    ToggleLike,
    React,
    AddComment,
    RefreshNews,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::CreatePost,
        ActionKind::ToggleLike,
        ActionKind::React,
        ActionKind::AddComment,
        ActionKind::RefreshNews,
    ];

    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            ActionKind::CreatePost => "create-post",
            ActionKind::ToggleLike => "like",
            ActionKind::React => "react",
            ActionKind::AddComment => "comment",
            ActionKind::RefreshNews => "refresh-news",
        }
    }
}

/// Maps the action identifiers a front-end declares to the handler that serves them.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Bindings {
    actions: HashMap<String, ActionKind>,
}

impl Default for Bindings {
    fn default() -> Self {
        ActionKind::ALL
            .into_iter()
            .fold(Self::empty(), |bindings, kind| {
                bindings.bind(kind.identifier(), kind)
            })
    }
}

impl Bindings {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn bind(mut self, identifier: impl Into<String>, kind: ActionKind) -> Self {
        self.actions.insert(identifier.into(), kind);
        self
    }

    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<ActionKind> {
        self.actions.get(identifier).copied()
    }
}

/// A user interaction as reported by the front-end.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ActionEvent {
    pub action: String,
    pub control: ControlId,
    pub resource_id: Option<Id<PostMarker>>,
    pub payload: Option<String>,
}

impl ActionEvent {
    #[must_use]
    pub fn new(action: impl Into<String>, control: impl Into<ControlId>) -> Self {
        Self {
            action: action.into(),
            control: control.into(),
            resource_id: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_resource(mut self, resource_id: impl Into<Id<PostMarker>>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ActionRequest {
    pub resource_id: Option<Id<PostMarker>>,
    pub kind: ActionKind,
    pub payload: Option<String>,
}

#[must_use]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Outcome {
    /// No handler is bound to the action identifier.
    Unbound,
    /// The event lacked a post id or reaction.
    Incomplete,
    /// The same action is still waiting for its response.
    InFlight,
    /// The input was empty.
    Invalid,
    Accepted,
    Rejected,
    Failed,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Timings {
    pub notification_display: Duration,
    pub reload_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            notification_display: DEFAULT_DISPLAY,
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }
}

struct Messages {
    rejected: &'static str,
    failed: &'static str,
}

const CREATE_POST: Messages = Messages {
    rejected: "Failed to create post",
    failed: "Failed to create post. Please try again.",
};
const TOGGLE_LIKE: Messages = Messages {
    rejected: "Failed to like post",
    failed: "Failed to like post. Please try again.",
};
const REACT: Messages = Messages {
    rejected: "Failed to add reaction",
    failed: "Failed to add reaction. Please try again.",
};
const ADD_COMMENT: Messages = Messages {
    rejected: "Failed to add comment",
    failed: "Failed to add comment. Please try again.",
};

pub const EMPTY_POST: &str = "Please enter some content for your post";
pub const EMPTY_COMMENT: &str = "Please enter a comment";
pub const POST_CREATED: &str = "Post created successfully!";
pub const COMMENT_ADDED: &str = "Comment added successfully!";

const LIKE: &str = "Like";
const UNLIKE: &str = "Unlike";

pub struct Dispatcher<A, V> {
    api: A,
    view: V,
    bindings: Bindings,
    notifications: Notifications,
    in_flight: InFlight,
    reload_delay: Duration,
}

impl<A: Api, V: View> Dispatcher<A, V> {
    #[must_use]
    pub fn new(api: A, view: V, bindings: Bindings, timings: Timings) -> Self {
        Self {
            api,
            view,
            bindings,
            notifications: Notifications::new(timings.notification_display),
            in_flight: InFlight::default(),
            reload_delay: timings.reload_delay,
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    #[must_use]
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Moves a draft handed over from another page into the post composer.
    pub fn restore_draft(&self) -> bool {
        match self.view.take_draft() {
            Some(draft) => {
                debug!("Restoring shared draft");
                self.view.fill_composer(&draft);
                true
            }
            None => false,
        }
    }

    pub async fn dispatch(&self, event: ActionEvent) -> Outcome {
        let Some(kind) = self.bindings.resolve(&event.action) else {
            debug!(action = %event.action, "No handler bound to action");
            return Outcome::Unbound;
        };

        let request = ActionRequest {
            resource_id: event.resource_id,
            kind,
            payload: event.payload,
        };
        self.perform(&event.control, request).await
    }

    pub async fn perform(&self, control: &ControlId, request: ActionRequest) -> Outcome {
        let ActionRequest {
            resource_id,
            kind,
            payload,
        } = request;

        match (kind, resource_id) {
            (ActionKind::CreatePost, _) => self.create_post(control, payload.as_deref()).await,
            (ActionKind::RefreshNews, _) => self.refresh_news(control),
            (ActionKind::ToggleLike, Some(post)) => self.toggle_like(control, post).await,
            (ActionKind::React, Some(post)) => {
                let Some(name) = payload else {
                    return Self::incomplete(kind, "reaction");
                };
                match name.parse::<Reaction>() {
                    Ok(reaction) => self.react(control, post, reaction).await,
                    Err(err) => {
                        warn!(error = %err, "Dropping reaction");
                        Outcome::Incomplete
                    }
                }
            }
            (ActionKind::AddComment, Some(post)) => {
                self.add_comment(control, post, payload.as_deref()).await
            }
            (ActionKind::ToggleLike | ActionKind::React | ActionKind::AddComment, None) => {
                Self::incomplete(kind, "post id")
            }
        }
    }

    fn incomplete(kind: ActionKind, missing: &'static str) -> Outcome {
        warn!(action = kind.identifier(), missing, "Dropping incomplete action");
        Outcome::Incomplete
    }

    async fn create_post(&self, control: &ControlId, payload: Option<&str>) -> Outcome {
        let Some(_token) = self.in_flight.acquire(ActionKey::CreatePost) else {
            debug!("Post creation already in flight");
            return Outcome::InFlight;
        };

        let Ok(content) = Content::new(payload.unwrap_or_default()) else {
            self.notifications.notify(EMPTY_POST, Severity::Warning);
            return Outcome::Invalid;
        };

        let _loading = Loading::start(&self.view, control);
        let result = self.api.create_post(&content).await;

        match self.conclude(ActionKind::CreatePost, result, &CREATE_POST) {
            Ok(_) => {
                self.notifications.notify(POST_CREATED, Severity::Success);
                self.view.clear_input(control);
                self.view.schedule_reload(self.reload_delay);
                Outcome::Accepted
            }
            Err(outcome) => outcome,
        }
    }

    async fn toggle_like(&self, control: &ControlId, post: Id<PostMarker>) -> Outcome {
        let Some(_token) = self.in_flight.acquire(ActionKey::ToggleLike(post.clone())) else {
            debug!(%post, "Like already in flight");
            return Outcome::InFlight;
        };

        let original = self.view.label(control);
        match original.as_deref() {
            Some(LIKE) => self.view.set_label(control, UNLIKE),
            Some(UNLIKE) => self.view.set_label(control, LIKE),
            _ => {}
        }

        let _loading = Loading::start(&self.view, control);
        let result = self.api.toggle_like(&post).await;

        match self.conclude(ActionKind::ToggleLike, result, &TOGGLE_LIKE) {
            Ok(toggled) => {
                self.view.set_label(control, toggled.label());
                self.view.set_like_count(&post, &toggled.count_text());
                self.view.animate(control);
                Outcome::Accepted
            }
            Err(outcome) => {
                if let Some(label) = original {
                    self.view.set_label(control, &label);
                }
                outcome
            }
        }
    }

    async fn react(&self, control: &ControlId, post: Id<PostMarker>, reaction: Reaction) -> Outcome {
        let Some(_token) = self.in_flight.acquire(ActionKey::React(post.clone())) else {
            debug!(%post, "Reaction already in flight");
            return Outcome::InFlight;
        };

        let _loading = Loading::start(&self.view, control);
        let result = self.api.react(&post, reaction).await;

        match self.conclude(ActionKind::React, result, &REACT) {
            Ok(_) => {
                self.notifications
                    .notify(format!("Reacted with {reaction}!"), Severity::Success);
                self.view.animate(control);
                Outcome::Accepted
            }
            Err(outcome) => outcome,
        }
    }

    async fn add_comment(
        &self,
        control: &ControlId,
        post: Id<PostMarker>,
        payload: Option<&str>,
    ) -> Outcome {
        let Some(_token) = self.in_flight.acquire(ActionKey::AddComment(post.clone())) else {
            debug!(%post, "Comment already in flight");
            return Outcome::InFlight;
        };

        let Ok(content) = Content::new(payload.unwrap_or_default()) else {
            self.notifications.notify(EMPTY_COMMENT, Severity::Warning);
            return Outcome::Invalid;
        };

        let _loading = Loading::start(&self.view, control);
        let result = self.api.add_comment(&post, &content).await;

        match self.conclude(ActionKind::AddComment, result, &ADD_COMMENT) {
            Ok(_) => {
                self.notifications.notify(COMMENT_ADDED, Severity::Success);
                self.view.clear_input(control);
                self.view.schedule_reload(self.reload_delay);
                Outcome::Accepted
            }
            Err(outcome) => outcome,
        }
    }

    fn refresh_news(&self, control: &ControlId) -> Outcome {
        let _loading = Loading::start(&self.view, control);
        self.view.schedule_reload(Duration::ZERO);
        Outcome::Accepted
    }

    /// Reports a rejection or failure and hands back the accepted payload otherwise.
    fn conclude<T>(
        &self,
        kind: ActionKind,
        result: Result<Settled<T>>,
        messages: &Messages,
    ) -> Result<T, Outcome> {
        match result {
            Ok(Settled::Accepted(data)) => Ok(data),
            Ok(Settled::Rejected { reason }) => {
                debug!(action = kind.identifier(), ?reason, "Action rejected");
                self.notifications.notify(
                    reason.unwrap_or_else(|| messages.rejected.to_owned()),
                    Severity::Error,
                );
                Err(Outcome::Rejected)
            }
            Err(err) => {
                error!(error = %err, action = kind.identifier(), "Action request failed");
                self.notifications.notify(messages.failed, Severity::Error);
                Err(Outcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ClientError, Result,
        api::Api,
        dispatch::{
            ActionEvent, ActionKind, Bindings, COMMENT_ADDED, Dispatcher, EMPTY_COMMENT,
            EMPTY_POST, Outcome, POST_CREATED, Timings,
        },
        view::{ControlId, MemoryView, View},
    };
    use socialfeed_common::model::{
        Id,
        envelope::Settled,
        notification::Severity,
        post::{CommentAdded, Content, LikeToggled, PostCreated, PostMarker, Reacted, Reaction},
    };
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
        time::Duration,
    };
    use tokio::sync::Notify;

    #[derive(Clone, Debug)]
    enum Reply {
        Accept,
        Reject(Option<&'static str>),
        Break,
    }

    struct FakeApi {
        reply: Reply,
        view: MemoryView,
        watched: ControlId,
        gate: Option<Rc<Notify>>,
        calls: Cell<usize>,
        sent: RefCell<Vec<String>>,
        loading_during_call: RefCell<Vec<bool>>,
    }

    impl FakeApi {
        async fn answer<T>(&self, sent: String, accepted: T) -> Result<Settled<T>> {
            self.calls.set(self.calls.get() + 1);
            self.sent.borrow_mut().push(sent);
            self.loading_during_call
                .borrow_mut()
                .push(self.view.is_loading(&self.watched));

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            match &self.reply {
                Reply::Accept => Ok(Settled::Accepted(accepted)),
                Reply::Reject(reason) => Ok(Settled::Rejected {
                    reason: reason.map(str::to_owned),
                }),
                Reply::Break => Err(ClientError::Decode(
                    serde_json::from_str::<serde_json::Value>("<html>")
                        .expect_err("markup is not JSON"),
                )),
            }
        }
    }

    impl Api for FakeApi {
        async fn create_post(&self, content: &Content) -> Result<Settled<PostCreated>> {
            self.answer(content.get().to_owned(), PostCreated::default())
                .await
        }

        async fn toggle_like(&self, post: &Id<PostMarker>) -> Result<Settled<LikeToggled>> {
            let toggled = LikeToggled {
                liked: true,
                like_count: 42,
            };
            self.answer(post.to_string(), toggled).await
        }

        async fn react(&self, post: &Id<PostMarker>, reaction: Reaction) -> Result<Settled<Reacted>> {
            self.answer(format!("{post}:{reaction}"), Reacted::default())
                .await
        }

        async fn add_comment(
            &self,
            post: &Id<PostMarker>,
            content: &Content,
        ) -> Result<Settled<CommentAdded>> {
            self.answer(format!("{post}:{}", content.get()), CommentAdded::default())
                .await
        }
    }

    const COMPOSER: &str = "postContent";
    const LIKE_BUTTON: &str = "like-btn-p1";
    const REACTION_BUTTON: &str = "reaction-btn-p1-love";
    const COMMENT_FORM: &str = "comment-form-p1";

    fn dispatcher_watching(
        reply: Reply,
        watched: &str,
        gate: Option<Rc<Notify>>,
    ) -> Dispatcher<FakeApi, MemoryView> {
        let view = MemoryView::default();
        let api = FakeApi {
            reply,
            view: view.clone(),
            watched: ControlId::new(watched),
            gate,
            calls: Cell::new(0),
            sent: RefCell::default(),
            loading_during_call: RefCell::default(),
        };
        Dispatcher::new(api, view, Bindings::default(), Timings::default())
    }

    fn dispatcher(reply: Reply) -> Dispatcher<FakeApi, MemoryView> {
        dispatcher_watching(reply, COMPOSER, None)
    }

    fn post_event(text: &str) -> ActionEvent {
        ActionEvent::new("create-post", COMPOSER).with_payload(text)
    }

    fn like_event(post: &str) -> ActionEvent {
        ActionEvent::new("like", LIKE_BUTTON).with_resource(post)
    }

    fn comment_event(text: &str) -> ActionEvent {
        ActionEvent::new("comment", COMMENT_FORM)
            .with_resource("p1")
            .with_payload(text)
    }

    fn messages(dispatcher: &Dispatcher<FakeApi, MemoryView>) -> Vec<(Severity, String)> {
        dispatcher
            .notifications()
            .active()
            .into_iter()
            .map(|notification| (notification.severity, notification.message))
            .collect()
    }

    #[tokio::test]
    async fn blank_content_never_reaches_the_network() {
        let dispatcher = dispatcher(Reply::Accept);

        for text in ["", "   ", "\n\t "] {
            assert_eq!(dispatcher.dispatch(post_event(text)).await, Outcome::Invalid);
            assert_eq!(dispatcher.dispatch(comment_event(text)).await, Outcome::Invalid);
        }
        let missing = ActionEvent::new("create-post", COMPOSER);
        assert_eq!(dispatcher.dispatch(missing).await, Outcome::Invalid);

        assert_eq!(dispatcher.api().calls.get(), 0);
        let messages = messages(&dispatcher);
        assert_eq!(messages.len(), 7);
        assert!(
            messages
                .iter()
                .all(|(severity, _)| *severity == Severity::Warning)
        );
        assert_eq!(messages[0].1, EMPTY_POST);
        assert_eq!(messages[1].1, EMPTY_COMMENT);
        assert!(dispatcher.in_flight().is_empty());
        assert!(!dispatcher.view().is_loading(&ControlId::new(COMPOSER)));
    }

    #[tokio::test]
    async fn loading_spans_the_request_on_every_path() {
        for reply in [Reply::Accept, Reply::Reject(None), Reply::Break] {
            let dispatcher = dispatcher_watching(reply.clone(), COMPOSER, None);
            let _ = dispatcher.dispatch(post_event("hello")).await;

            assert_eq!(*dispatcher.api().loading_during_call.borrow(), [true]);
            assert!(!dispatcher.view().is_loading(&ControlId::new(COMPOSER)));
            assert!(dispatcher.in_flight().is_empty());

            let dispatcher = dispatcher_watching(reply, COMMENT_FORM, None);
            let _ = dispatcher.dispatch(comment_event("nice")).await;

            assert_eq!(*dispatcher.api().loading_during_call.borrow(), [true]);
            assert!(!dispatcher.view().is_loading(&ControlId::new(COMMENT_FORM)));
            assert!(dispatcher.in_flight().is_empty());
        }
    }

    #[tokio::test]
    async fn created_post_clears_input_and_schedules_reload() {
        let dispatcher = dispatcher(Reply::Accept);
        let composer = ControlId::new(COMPOSER);
        dispatcher.view().set_input(&composer, "  hello world ");

        let outcome = dispatcher.dispatch(post_event("  hello world ")).await;

        assert_eq!(outcome, Outcome::Accepted);
        assert_eq!(*dispatcher.api().sent.borrow(), ["hello world"]);
        assert_eq!(dispatcher.view().input(&composer), None);
        assert_eq!(dispatcher.view().reload(), Some(Duration::from_millis(1000)));
        assert_eq!(
            messages(&dispatcher),
            [(Severity::Success, POST_CREATED.to_owned())]
        );
    }

    #[tokio::test]
    async fn rejection_uses_server_reason_or_fallback() {
        let dispatcher = dispatcher(Reply::Reject(Some("Post content cannot be empty")));
        assert_eq!(
            dispatcher.dispatch(post_event("hello")).await,
            Outcome::Rejected
        );

        let fallback = self::dispatcher(Reply::Reject(None));
        assert_eq!(fallback.dispatch(post_event("hello")).await, Outcome::Rejected);
        assert_eq!(fallback.dispatch(like_event("p1")).await, Outcome::Rejected);
        assert_eq!(fallback.dispatch(comment_event("hi")).await, Outcome::Rejected);
        let reaction = ActionEvent::new("react", REACTION_BUTTON)
            .with_resource("p1")
            .with_payload("love");
        assert_eq!(fallback.dispatch(reaction).await, Outcome::Rejected);

        assert_eq!(
            messages(&dispatcher),
            [(Severity::Error, "Post content cannot be empty".to_owned())]
        );
        assert_eq!(
            messages(&fallback),
            [
                (Severity::Error, "Failed to create post".to_owned()),
                (Severity::Error, "Failed to like post".to_owned()),
                (Severity::Error, "Failed to add comment".to_owned()),
                (Severity::Error, "Failed to add reaction".to_owned()),
            ]
        );
        assert_eq!(fallback.view().reload(), None);
    }

    #[tokio::test]
    async fn transport_failure_is_reported_once() {
        let dispatcher = dispatcher(Reply::Break);
        let composer = ControlId::new(COMPOSER);
        dispatcher.view().set_input(&composer, "hello");

        assert_eq!(
            dispatcher.dispatch(post_event("hello")).await,
            Outcome::Failed
        );

        assert_eq!(dispatcher.api().calls.get(), 1);
        assert_eq!(dispatcher.view().input(&composer).as_deref(), Some("hello"));
        assert_eq!(dispatcher.view().reload(), None);
        assert_eq!(
            messages(&dispatcher),
            [(
                Severity::Error,
                "Failed to create post. Please try again.".to_owned()
            )]
        );
    }

    #[tokio::test]
    async fn like_renders_label_and_count() {
        let dispatcher = dispatcher(Reply::Accept);
        let button = ControlId::new(LIKE_BUTTON);
        dispatcher.view().set_label(&button, "Like");

        assert_eq!(dispatcher.dispatch(like_event("p1")).await, Outcome::Accepted);

        assert_eq!(dispatcher.view().label(&button).as_deref(), Some("Unlike"));
        assert_eq!(
            dispatcher.view().like_count(&Id::new("p1")).as_deref(),
            Some("42 likes")
        );
        assert_eq!(dispatcher.view().snapshot().animated, [button]);
        assert!(messages(&dispatcher).is_empty());
    }

    #[tokio::test]
    async fn like_failure_restores_the_label() {
        let gate = Rc::new(Notify::new());
        let dispatcher = dispatcher_watching(Reply::Break, LIKE_BUTTON, Some(gate.clone()));
        let button = ControlId::new(LIKE_BUTTON);
        dispatcher.view().set_label(&button, "Like");

        let (outcome, label_during_call) = tokio::join!(dispatcher.dispatch(like_event("p1")), async {
            tokio::task::yield_now().await;
            let label = dispatcher.view().label(&button);
            gate.notify_one();
            label
        });

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(label_during_call.as_deref(), Some("Unlike"));
        assert_eq!(dispatcher.view().label(&button).as_deref(), Some("Like"));
        assert_eq!(dispatcher.view().like_count(&Id::new("p1")), None);
        assert!(!dispatcher.view().is_loading(&button));
        assert_eq!(
            messages(&dispatcher),
            [(
                Severity::Error,
                "Failed to like post. Please try again.".to_owned()
            )]
        );
    }

    #[tokio::test]
    async fn like_rejection_restores_the_label() {
        let dispatcher = dispatcher(Reply::Reject(Some("Post not found")));
        let button = ControlId::new(LIKE_BUTTON);
        dispatcher.view().set_label(&button, "Unlike");

        assert_eq!(dispatcher.dispatch(like_event("p1")).await, Outcome::Rejected);

        assert_eq!(dispatcher.view().label(&button).as_deref(), Some("Unlike"));
        assert_eq!(
            messages(&dispatcher),
            [(Severity::Error, "Post not found".to_owned())]
        );
    }

    #[tokio::test]
    async fn second_post_while_first_in_flight_is_a_no_op() {
        let gate = Rc::new(Notify::new());
        let dispatcher = dispatcher_watching(Reply::Accept, COMPOSER, Some(gate.clone()));

        let (first, second, ()) = tokio::join!(
            dispatcher.dispatch(post_event("hello")),
            dispatcher.dispatch(post_event("hello again")),
            async {
                tokio::task::yield_now().await;
                gate.notify_one();
            },
        );

        assert_eq!(first, Outcome::Accepted);
        assert_eq!(second, Outcome::InFlight);
        assert_eq!(dispatcher.api().calls.get(), 1);
        assert_eq!(*dispatcher.api().sent.borrow(), ["hello"]);
        assert!(dispatcher.in_flight().is_empty());

        gate.notify_one();
        assert_eq!(
            dispatcher.dispatch(post_event("hello again")).await,
            Outcome::Accepted
        );
        assert_eq!(dispatcher.api().calls.get(), 2);
    }

    #[tokio::test]
    async fn different_actions_do_not_block_each_other() {
        let gate = Rc::new(Notify::new());
        let dispatcher = dispatcher_watching(Reply::Accept, COMPOSER, Some(gate.clone()));

        let (post, like_p1, like_p2, like_p1_again, ()) = tokio::join!(
            dispatcher.dispatch(post_event("hello")),
            dispatcher.dispatch(like_event("p1")),
            dispatcher.dispatch(like_event("p2")),
            dispatcher.dispatch(like_event("p1")),
            async {
                tokio::task::yield_now().await;
                gate.notify_waiters();
            },
        );

        assert_eq!(post, Outcome::Accepted);
        assert_eq!(like_p1, Outcome::Accepted);
        assert_eq!(like_p2, Outcome::Accepted);
        assert_eq!(like_p1_again, Outcome::InFlight);
        assert_eq!(dispatcher.api().calls.get(), 3);
    }

    #[tokio::test]
    async fn reaction_is_announced() {
        let dispatcher = dispatcher(Reply::Accept);
        let event = ActionEvent::new("react", REACTION_BUTTON)
            .with_resource("p1")
            .with_payload("love");

        assert_eq!(dispatcher.dispatch(event).await, Outcome::Accepted);

        assert_eq!(*dispatcher.api().sent.borrow(), ["p1:love"]);
        assert_eq!(
            messages(&dispatcher),
            [(Severity::Success, "Reacted with love!".to_owned())]
        );
        assert_eq!(
            dispatcher.view().snapshot().animated,
            [ControlId::new(REACTION_BUTTON)]
        );
    }

    #[tokio::test]
    async fn incomplete_events_are_dropped_silently() {
        let dispatcher = dispatcher(Reply::Accept);

        let events = [
            ActionEvent::new("like", LIKE_BUTTON),
            ActionEvent::new("react", REACTION_BUTTON).with_payload("love"),
            ActionEvent::new("react", REACTION_BUTTON).with_resource("p1"),
            ActionEvent::new("react", REACTION_BUTTON)
                .with_resource("p1")
                .with_payload("thumbsup"),
            ActionEvent::new("comment", COMMENT_FORM).with_payload("hi"),
        ];
        for event in events {
            assert_eq!(dispatcher.dispatch(event).await, Outcome::Incomplete);
        }

        assert_eq!(dispatcher.api().calls.get(), 0);
        assert!(messages(&dispatcher).is_empty());
        assert_eq!(dispatcher.view().snapshot(), MemoryView::default().snapshot());
    }

    #[tokio::test]
    async fn added_comment_clears_input_and_schedules_reload() {
        let dispatcher = dispatcher(Reply::Accept);
        let form = ControlId::new(COMMENT_FORM);
        dispatcher.view().set_input(&form, "nice post");

        assert_eq!(
            dispatcher.dispatch(comment_event(" nice post ")).await,
            Outcome::Accepted
        );

        assert_eq!(*dispatcher.api().sent.borrow(), ["p1:nice post"]);
        assert_eq!(dispatcher.view().input(&form), None);
        assert_eq!(dispatcher.view().reload(), Some(Duration::from_millis(1000)));
        assert_eq!(
            messages(&dispatcher),
            [(Severity::Success, COMMENT_ADDED.to_owned())]
        );
    }

    #[tokio::test]
    async fn refresh_news_reloads_without_a_request() {
        let dispatcher = dispatcher(Reply::Accept);
        let button = ControlId::new("refresh-news-btn");

        let outcome = dispatcher
            .dispatch(ActionEvent::new("refresh-news", button.clone()))
            .await;

        assert_eq!(outcome, Outcome::Accepted);
        assert_eq!(dispatcher.api().calls.get(), 0);
        assert_eq!(dispatcher.view().reload(), Some(Duration::ZERO));
        assert!(!dispatcher.view().is_loading(&button));
    }

    #[tokio::test]
    async fn unbound_actions_are_reported() {
        let view = MemoryView::default();
        let api = FakeApi {
            reply: Reply::Accept,
            view: view.clone(),
            watched: ControlId::new(COMPOSER),
            gate: None,
            calls: Cell::new(0),
            sent: RefCell::default(),
            loading_during_call: RefCell::default(),
        };
        let bindings = Bindings::empty().bind("createPostForm", ActionKind::CreatePost);
        let dispatcher = Dispatcher::new(api, view, bindings, Timings::default());

        assert_eq!(
            dispatcher.dispatch(post_event("hello")).await,
            Outcome::Unbound
        );
        assert_eq!(
            dispatcher
                .dispatch(ActionEvent::new("createPostForm", COMPOSER).with_payload("hello"))
                .await,
            Outcome::Accepted
        );
        assert_eq!(dispatcher.api().calls.get(), 1);
    }

    #[tokio::test]
    async fn shared_draft_fills_the_composer_once() {
        let dispatcher = dispatcher(Reply::Accept);
        dispatcher.view().set_draft("Breaking: Rust everywhere");

        assert!(dispatcher.restore_draft());
        assert!(!dispatcher.restore_draft());
        assert_eq!(
            dispatcher.view().input(&ControlId::new(COMPOSER)).as_deref(),
            Some("Breaking: Rust everywhere")
        );
    }

    #[test]
    fn default_bindings_cover_every_action() {
        let bindings = Bindings::default();

        for kind in ActionKind::ALL {
            assert_eq!(bindings.resolve(kind.identifier()), Some(kind));
        }
        assert_eq!(bindings.resolve("share"), None);
    }
}
