use crate::Result;
use socialfeed_common::model::{
    Id,
    envelope::Settled,
    post::{CommentAdded, Content, LikeToggled, PostCreated, PostMarker, Reacted, Reaction},
};

mod http;

pub use http::HttpApi;

/// The mutating endpoints of the SocialFeed backend.
///
/// Each call is issued exactly once; retrying is left to the user.
pub trait Api {
    fn create_post(&self, content: &Content) -> impl Future<Output = Result<Settled<PostCreated>>>;

    fn toggle_like(&self, post: &Id<PostMarker>)
    -> impl Future<Output = Result<Settled<LikeToggled>>>;

    fn react(
        &self,
        post: &Id<PostMarker>,
        reaction: Reaction,
    ) -> impl Future<Output = Result<Settled<Reacted>>>;

    fn add_comment(
        &self,
        post: &Id<PostMarker>,
        content: &Content,
    ) -> impl Future<Output = Result<Settled<CommentAdded>>>;
}
