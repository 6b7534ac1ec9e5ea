mod command;
mod terminal;

use command::{Command, HELP};
use serde::Deserialize;
use socialfeed_client::{
    ClientError,
    api::HttpApi,
    dispatch::{Bindings, Dispatcher, Timings},
};
use socialfeed_common::model::news::NewsCategory;
use std::{path::PathBuf, pin::Pin, time::Duration};
use terminal::{TerminalView, render_feed};
use thiserror::Error;
use time::UtcDateTime;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{Sleep, sleep},
};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error setting up the api client: {0}")]
    Client(#[from] ClientError),
    #[error("Error reading stdin: {0}")]
    Stdin(std::io::Error),
}

fn default_notification_ms() -> u64 {
    3000
}

fn default_reload_delay_ms() -> u64 {
    1000
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    base_url: Url,
    #[serde(default = "default_notification_ms")]
    notification_ms: u64,
    #[serde(default = "default_reload_delay_ms")]
    reload_delay_ms: u64,
    #[serde(default)]
    draft_file: Option<PathBuf>,
}

impl Env {
    fn timings(&self) -> Timings {
        Timings {
            notification_display: Duration::from_millis(self.notification_ms),
            reload_delay: Duration::from_millis(self.reload_delay_ms),
        }
    }
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "socialfeed_cli=debug,\
                socialfeed_client=debug,\
                socialfeed_common=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

struct App {
    dispatcher: Dispatcher<HttpApi, TerminalView>,
    category: NewsCategory,
}

impl App {
    async fn show_news(&self, category: NewsCategory) {
        match self.dispatcher.api().fetch_news(category).await {
            Ok(feed) => print!("{}", render_feed(&feed, UtcDateTime::now())),
            Err(e) => {
                error!(error = %e, %category, "Could not fetch news");
                println!("Could not load {category} news.");
            }
        }
    }

    /// Returns `false` once the user asked to quit.
    async fn run(&mut self, command: Command) -> bool {
        if let Some(event) = command.event() {
            let outcome = self.dispatcher.dispatch(event).await;
            debug!(?outcome, "Dispatched command");
        } else {
            match command {
                Command::News(category) => {
                    self.category = category;
                    self.show_news(category).await;
                }
                Command::Dismiss(id) => {
                    if self.dispatcher.notifications().dismiss(id).is_none() {
                        println!("No notification #{id} on display.");
                    }
                }
                Command::Help => println!("{HELP}"),
                Command::Quit => return false,
                Command::Post(_)
                | Command::Like(_)
                | Command::React(..)
                | Command::Comment(..)
                | Command::Refresh => {}
            }
        }

        self.dispatcher
            .view()
            .show_new(&self.dispatcher.notifications().active());
        true
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let api = HttpApi::new(env.base_url.clone())?;
    let view = TerminalView::new(env.draft_file.clone());
    let dispatcher = Dispatcher::new(api, view, Bindings::default(), env.timings());
    info!(base_url = %env.base_url, "Connected front-end");

    let mut app = App {
        dispatcher,
        category: NewsCategory::default(),
    };
    app.dispatcher.restore_draft();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reload: Option<Pin<Box<Sleep>>> = None;

    loop {
        if let Some(after) = app.dispatcher.view().take_reload() {
            reload = Some(Box::pin(sleep(after)));
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.map_err(InitError::Stdin)? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(command) => {
                        if !app.run(command).await {
                            break;
                        }
                    }
                    Err(e) => println!("{e}. Type `help` for a list of commands."),
                }
            }
            Some(expired) = app.dispatcher.notifications().next_expired(),
                if app.dispatcher.notifications().has_pending() =>
            {
                app.dispatcher.view().show_expired(&expired);
            }
            () = async {
                if let Some(reload) = reload.as_mut() {
                    reload.await;
                }
            }, if reload.is_some() => {
                reload = None;
                debug!(category = %app.category, "Reloading feed");
                app.show_news(app.category).await;
            }
        }
    }

    Ok(())
}
