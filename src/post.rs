use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiFuture, Client};

use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PostId(String);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub name: String,
    pub avatar: String,
    /// ISO-8601, as stored by the API.
    pub created_at: String,
}

/// Partial post sent on create and update. Unset fields are left out of the
/// request body.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl PostId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        PostId(id)
    }
}

impl<'a> From<&'a str> for PostId {
    fn from(id: &'a str) -> Self {
        PostId(id.to_string())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Post resource of the remote API. Every operation is a single request.
pub trait PostApi {
    fn list_posts(&self) -> ApiFuture<Vec<Post>>;

    fn get_post(&self, id: &PostId) -> ApiFuture<Post>;

    fn create_post(&self, post: &PostDraft) -> ApiFuture<Post>;

    fn update_post(&self, id: &PostId, post: &PostDraft) -> ApiFuture<Post>;

    /// The response body is whatever the server chooses to echo back.
    fn delete_post(&self, id: &PostId) -> ApiFuture<Value>;
}

pub(crate) fn post_path(id: &PostId) -> String {
    format!("post/{}", id.as_str())
}

impl PostApi for Client {
    fn list_posts(&self) -> ApiFuture<Vec<Post>> {
        self.http.get("post")
    }

    fn get_post(&self, id: &PostId) -> ApiFuture<Post> {
        self.http.get(&post_path(id))
    }

    fn create_post(&self, post: &PostDraft) -> ApiFuture<Post> {
        self.http.post("post", post)
    }

    fn update_post(&self, id: &PostId, post: &PostDraft) -> ApiFuture<Post> {
        self.http.put(&post_path(id), post)
    }

    fn delete_post(&self, id: &PostId) -> ApiFuture<Value> {
        self.http.delete(&post_path(id))
    }
}
