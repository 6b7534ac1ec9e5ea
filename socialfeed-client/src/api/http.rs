use crate::{ClientError, Result, api::Api};
use reqwest::{Client, RequestBuilder, Url, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use socialfeed_common::model::{
    Id,
    envelope::{ResultEnvelope, Settled},
    news::{NewsCategory, NewsFeed},
    post::{
        CommentAdded, Content, LikeToggled, PostCreated, PostMarker, Reacted, Reaction,
        ReactionChoice,
    },
};
use tracing::debug;

const JSON: &str = "application/json";

#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn post_request(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self
            .client
            .post(self.endpoint(segments)?)
            .header(CONTENT_TYPE, JSON))
    }

    async fn settle<T: DeserializeOwned>(request: RequestBuilder) -> Result<Settled<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!(%status, bytes = body.len(), "Received envelope");

        let envelope: ResultEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.settle()?)
    }

    /// Fetches the headlines of one category. This endpoint replies without an envelope.
    pub async fn fetch_news(&self, category: NewsCategory) -> Result<NewsFeed> {
        let url = self.endpoint(&["api", "news", category.as_str()])?;
        let body = self.client.get(url).send().await?.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

impl Api for HttpApi {
    async fn create_post(&self, content: &Content) -> Result<Settled<PostCreated>> {
        let request = self.post_request(&["api", "posts"])?.json(content);
        Self::settle(request).await
    }

    async fn toggle_like(&self, post: &Id<PostMarker>) -> Result<Settled<LikeToggled>> {
        let request = self.post_request(&["api", "posts", post.get(), "like"])?;
        Self::settle(request).await
    }

    async fn react(&self, post: &Id<PostMarker>, reaction: Reaction) -> Result<Settled<Reacted>> {
        let request = self
            .post_request(&["api", "posts", post.get(), "react"])?
            .json(&ReactionChoice { reaction });
        Self::settle(request).await
    }

    async fn add_comment(
        &self,
        post: &Id<PostMarker>,
        content: &Content,
    ) -> Result<Settled<CommentAdded>> {
        let request = self
            .post_request(&["api", "posts", post.get(), "comments"])?
            .json(content);
        Self::settle(request).await
    }
}
