use futures::Future;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiFuture, Client};
use crate::post::{post_path, PostId};

use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommentId(String);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub name: String,
    pub avatar: String,
    pub created_at: String,
    /// Owning post. Never changes once set.
    pub parent_id: Option<PostId>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// `Some(None)` is sent as an explicit `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<PostId>>,
}

impl CommentId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for CommentId {
    fn from(id: String) -> Self {
        CommentId(id)
    }
}

impl<'a> From<&'a str> for CommentId {
    fn from(id: &'a str) -> Self {
        CommentId(id.to_string())
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comment sub-resource of a post.
pub trait CommentApi {
    /// A post without a comment collection answers 404; implementations
    /// report that as an empty list. Any other failure is an error.
    fn list_comments(&self, post_id: &PostId) -> ApiFuture<Vec<Comment>>;

    fn create_comment(&self, post_id: &PostId, comment: &CommentDraft) -> ApiFuture<Comment>;

    /// Plain PUT on the nested resource. The mock backend does not apply it,
    /// which is why edits go through [`CommentApi::update_comment`].
    fn update_comment_in_place(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        comment: &CommentDraft,
    ) -> ApiFuture<Comment>;

    fn delete_comment(&self, post_id: &PostId, comment_id: &CommentId) -> ApiFuture<Value>;

    /// Replace `original` with a comment carrying `content`.
    ///
    /// Issues a DELETE and, only once it succeeded, a POST. The two requests
    /// are not atomic: if the POST fails the original comment is already gone
    /// and the error of the POST is returned. The new comment has a new id.
    fn update_comment(&self, post_id: &PostId, original: &Comment, content: &str) -> ApiFuture<Comment>
    where
        Self: Clone + Send + Sized + 'static,
    {
        let api = self.clone();
        let post_id = post_id.clone();
        let original_id = original.id.clone();
        let replacement = replacement_for(original, content);

        let deleted = self.delete_comment(&post_id, &original.id);
        Box::new(deleted.and_then(move |_| {
            api.create_comment(&post_id, &replacement).map_err(move |err| {
                warn!(
                    "comment {} on post {} was deleted but recreating it failed: {}",
                    original_id, post_id, err
                );
                err
            })
        }))
    }
}

/// Body of the POST that stands in for an edit of `original`.
pub fn replacement_for(original: &Comment, content: &str) -> CommentDraft {
    CommentDraft {
        content: Some(content.trim().to_string()),
        name: Some(original.name.clone()),
        avatar: Some(original.avatar.clone()),
        created_at: Some(crate::timestamp()),
        parent_id: Some(original.parent_id.clone()),
    }
}

fn comments_path(post_id: &PostId) -> String {
    format!("{}/comment", post_path(post_id))
}

fn comment_path(post_id: &PostId, comment_id: &CommentId) -> String {
    format!("{}/{}", comments_path(post_id), comment_id.as_str())
}

impl CommentApi for Client {
    fn list_comments(&self, post_id: &PostId) -> ApiFuture<Vec<Comment>> {
        Box::new(self.http.get::<Vec<Comment>>(&comments_path(post_id)).or_else(|err| {
            if err.is_not_found() {
                Ok(Vec::new())
            } else {
                Err(err)
            }
        }))
    }

    fn create_comment(&self, post_id: &PostId, comment: &CommentDraft) -> ApiFuture<Comment> {
        self.http.post(&comments_path(post_id), comment)
    }

    fn update_comment_in_place(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        comment: &CommentDraft,
    ) -> ApiFuture<Comment> {
        self.http.put(&comment_path(post_id, comment_id), comment)
    }

    fn delete_comment(&self, post_id: &PostId, comment_id: &CommentId) -> ApiFuture<Value> {
        self.http.delete(&comment_path(post_id, comment_id))
    }
}
