use crate::post::PostId;

use std::fmt;

/// Navigation parameter of the feed: either the whole list or one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Post(PostId),
}

impl Route {
    /// Unknown paths redirect to the list.
    pub fn from_path(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["posts", id] => Route::Post(PostId::from(*id)),
            _ => Route::Home,
        }
    }

    pub fn post_id(&self) -> Option<&PostId> {
        match self {
            Route::Home => None,
            Route::Post(id) => Some(id),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Post(id) => format!("/posts/{}", id),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Route::Home
    }
}

impl From<Option<PostId>> for Route {
    fn from(id: Option<PostId>) -> Self {
        match id {
            Some(id) => Route::Post(id),
            None => Route::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.path())
    }
}
