pub mod avatar;
pub mod client;
pub mod comment;
pub mod composer;
pub mod config;
pub mod feed;
pub mod post;
pub mod route;
pub mod state;

pub use crate::client::Client;
pub use crate::client::Error;
pub use crate::comment::{Comment, CommentApi, CommentId};
pub use crate::feed::{Feed, Shell};
pub use crate::post::{Post, PostApi, PostId};
pub use crate::route::Route;
pub use crate::state::{FeedState, Msg};

use chrono::{SecondsFormat, Utc};

/// Current time the way the API stores `createdAt`.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
