use socialfeed_client::{dispatch::ActionEvent, view::COMPOSER};
use socialfeed_common::model::{
    Id,
    news::{NewsCategory, UnknownNewsCategoryError},
    notification::NotificationId,
    post::PostMarker,
};
use std::{num::ParseIntError, str::FromStr};
use thiserror::Error;

pub const REFRESH_BUTTON: &str = "refresh-news-btn";

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Command {
    Post(String),
    Like(Id<PostMarker>),
    React(Id<PostMarker>, String),
    Comment(Id<PostMarker>, String),
    News(NewsCategory),
    Refresh,
    Dismiss(NotificationId),
    Help,
    Quit,
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Category(#[from] UnknownNewsCategoryError),
    #[error("Invalid notification id: {0}")]
    NotificationId(#[from] ParseIntError),
}

pub const HELP: &str = "\
post <text>                  create a post
like <post>                  toggle your like on a post
react <post> <reaction>      react with like, love, laugh, wow, angry or sad
comment <post> <text>        comment on a post
news [category]              show headlines
refresh                      reload the news feed
dismiss <notification>       hide a notification
quit";

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn post_id(word: &str) -> Result<Id<PostMarker>, CommandError> {
    if word.is_empty() {
        Err(CommandError::MissingArgument("post id"))
    } else {
        Ok(Id::new(word))
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = split_word(s);

        match name {
            // Blank text is left for the dispatcher to reject with a warning.
            "post" => Ok(Command::Post(rest.to_owned())),
            "like" => Ok(Command::Like(post_id(rest)?)),
            "react" => {
                let (post, reaction) = split_word(rest);
                if reaction.is_empty() {
                    return Err(CommandError::MissingArgument("reaction"));
                }
                Ok(Command::React(post_id(post)?, reaction.to_owned()))
            }
            "comment" => {
                let (post, text) = split_word(rest);
                Ok(Command::Comment(post_id(post)?, text.to_owned()))
            }
            "news" if rest.is_empty() => Ok(Command::News(NewsCategory::default())),
            "news" => Ok(Command::News(rest.parse()?)),
            "refresh" => Ok(Command::Refresh),
            "dismiss" => Ok(Command::Dismiss(NotificationId::new(rest.parse()?))),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

impl Command {
    /// The front-end event this command stands for, if it is handled by the dispatcher.
    #[must_use]
    pub fn event(&self) -> Option<ActionEvent> {
        let event = match self {
            Command::Post(text) => ActionEvent::new("create-post", COMPOSER).with_payload(text),
            Command::Like(post) => {
                ActionEvent::new("like", like_button(post)).with_resource(post.clone())
            }
            Command::React(post, reaction) => {
                ActionEvent::new("react", format!("reaction-btn-{post}-{reaction}"))
                    .with_resource(post.clone())
                    .with_payload(reaction)
            }
            Command::Comment(post, text) => {
                ActionEvent::new("comment", comment_form(post))
                    .with_resource(post.clone())
                    .with_payload(text)
            }
            Command::Refresh => ActionEvent::new("refresh-news", REFRESH_BUTTON),
            Command::News(_) | Command::Dismiss(_) | Command::Help | Command::Quit => return None,
        };

        Some(event)
    }
}

#[must_use]
pub fn like_button(post: &Id<PostMarker>) -> String {
    format!("like-btn-{post}")
}

#[must_use]
pub fn comment_form(post: &Id<PostMarker>) -> String {
    format!("comment-form-{post}")
}
