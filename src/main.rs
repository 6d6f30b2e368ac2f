extern crate feed_client as feed;

use std::cell::Cell;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process;

use clap::{Parser, Subcommand};
use log::debug;

use feed::avatar::sanitize_avatar;
use feed::composer::{Author, ComposeMode, Composer};
use feed::config::Config;
use feed::{Client, CommentId, Feed, FeedState, Msg, PostId, Route, Shell};

#[derive(Parser, Debug)]
#[command(name = "feed-client", about = "Read and write the post feed")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every post, most recent first
    List,
    /// Show a post and its comments
    Show { id: String },
    /// Open a feed path such as /home or /posts/42
    Open { path: String },
    /// Publish a new post
    Post {
        content: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Replace the content of a post
    EditPost { id: String, content: String },
    /// Delete a post
    DeletePost {
        id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Comment on a post
    Comment {
        post_id: String,
        content: String,
        #[arg(long)]
        name: Option<String>,
        /// Reply to this comment
        #[arg(long)]
        reply_to: Option<String>,
    },
    /// Rewrite a comment; it comes back with a new id
    EditComment {
        post_id: String,
        comment_id: String,
        content: String,
    },
    /// Delete a comment
    DeleteComment {
        post_id: String,
        comment_id: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

struct Terminal {
    assume_yes: bool,
    failed: Cell<bool>,
}

impl Shell for Terminal {
    fn notify(&self, message: &str) {
        self.failed.set(true);
        eprintln!("error: {}", message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }

    fn navigate(&self, route: &Route) {
        debug!("now at {}", route);
    }
}

fn main() {
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

/// Returns whether the command went through without a failure notice.
fn run(cli: Cli) -> Result<bool, Box<dyn Error>> {
    let config = Config::from_env()?;
    let client = config.client()?;
    let mut rt = tokio::runtime::Runtime::new()?;

    let assume_yes = match &cli.command {
        Command::DeletePost { yes, .. } | Command::DeleteComment { yes, .. } => *yes,
        _ => false,
    };
    let shell = Terminal {
        assume_yes,
        failed: Cell::new(false),
    };
    let mut feed = Feed::new(client, shell);

    match cli.command {
        Command::List => feed.settle(&mut rt, Msg::RouteChanged(Route::Home)),
        Command::Show { id } => feed.settle(&mut rt, Msg::RouteChanged(Route::Post(PostId::from(id)))),
        Command::Open { path } => feed.settle(&mut rt, Msg::RouteChanged(Route::from_path(&path))),
        Command::Post {
            content,
            name,
            avatar,
        } => {
            let defaults = config.author.clone();
            let author = Author {
                name: name.unwrap_or(defaults.name),
                avatar: avatar.unwrap_or(defaults.avatar),
            };
            let mut composer = Composer::new(ComposeMode::Post, &author);
            composer.content = content;
            let tasks = feed.submit(&composer);
            feed.drive(&mut rt, tasks);
        }
        Command::EditPost { id, content } => {
            open_post(&mut feed, &mut rt, id);
            if let Some(post) = feed.state().current_post.clone() {
                let mut composer = Composer::new(ComposeMode::EditPost(post), &config.author);
                composer.content = content;
                let tasks = feed.submit(&composer);
                feed.drive(&mut rt, tasks);
            }
        }
        Command::DeletePost { id, .. } => {
            open_post(&mut feed, &mut rt, id.clone());
            if feed.state().is_detail() {
                feed.settle(&mut rt, Msg::DeletePostRequested(PostId::from(id)));
            }
        }
        Command::Comment {
            post_id,
            content,
            name,
            reply_to,
        } => {
            let post_id = PostId::from(post_id);
            open_post(&mut feed, &mut rt, post_id.to_string());
            if feed.state().is_detail() {
                let mode = match reply_to {
                    Some(comment_id) => {
                        let comment_id = CommentId::from(comment_id);
                        feed.dispatch(Msg::ReplyTo(comment_id.clone()));
                        ComposeMode::ReplyComment { post_id, comment_id }
                    }
                    None => ComposeMode::Comment(post_id),
                };
                let mut composer = Composer::new(mode, &config.author);
                if let Some(name) = name {
                    composer.name = name;
                }
                composer.content = content;
                let tasks = feed.submit(&composer);
                feed.drive(&mut rt, tasks);
            }
        }
        Command::EditComment {
            post_id,
            comment_id,
            content,
        } => {
            open_post(&mut feed, &mut rt, post_id.clone());
            let comment_id = CommentId::from(comment_id);
            if feed.state().is_detail() {
                let comment = feed
                    .state()
                    .comments
                    .iter()
                    .find(|comment| comment.id == comment_id)
                    .cloned()
                    .ok_or_else(|| format!("post {} has no comment {}", post_id, comment_id))?;
                feed.dispatch(Msg::EditComment(comment_id));
                let mode = ComposeMode::EditComment {
                    post_id: PostId::from(post_id),
                    comment,
                };
                let mut composer = Composer::new(mode, &config.author);
                composer.content = content;
                let tasks = feed.submit(&composer);
                feed.drive(&mut rt, tasks);
            }
        }
        Command::DeleteComment {
            post_id,
            comment_id,
            ..
        } => {
            open_post(&mut feed, &mut rt, post_id);
            if feed.state().is_detail() {
                feed.settle(&mut rt, Msg::DeleteCommentRequested(CommentId::from(comment_id)));
            }
        }
    }

    print_state(feed.state());
    let ok = !feed.shell().failed.get();
    feed.teardown();
    Ok(ok)
}

fn open_post(feed: &mut Feed<Client, Terminal>, rt: &mut tokio::runtime::Runtime, id: String) {
    feed.settle(rt, Msg::RouteChanged(Route::Post(PostId::from(id))));
}

fn print_state(state: &FeedState) {
    for post in &state.posts {
        println!("[{}] {} <{}> {}", post.id, post.name, sanitize_avatar(&post.avatar), post.created_at);
        println!("    {}", post.content);
    }

    if state.is_detail() {
        println!("{} comment(s)", state.comments.len());
        for comment in &state.comments {
            println!(
                "  [{}] {} <{}> {}",
                comment.id,
                comment.name,
                sanitize_avatar(&comment.avatar),
                comment.created_at
            );
            println!("      {}", comment.content);
        }
    }
}
