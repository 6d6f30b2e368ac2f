//! View state of the feed and the pure transitions over it.

use crate::client::Error;
use crate::comment::{Comment, CommentId};
use crate::composer::Submission;
use crate::post::{Post, PostId};
use crate::route::Route;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// Most recent first.
    pub posts: Vec<Post>,
    /// Set in detail mode only.
    pub current_post: Option<Post>,
    /// Most recently created or edited first.
    pub comments: Vec<Comment>,
    /// Comment whose edit box is open.
    pub editing: Option<CommentId>,
    /// Comment whose reply box is open.
    pub replying_to: Option<CommentId>,
}

impl FeedState {
    pub fn is_detail(&self) -> bool {
        self.current_post.is_some()
    }

    fn close_boxes(&mut self) {
        self.editing = None;
        self.replying_to = None;
    }
}

/// Everything the feed reacts to: navigation, user intents and completed
/// requests.
#[derive(Debug)]
pub enum Msg {
    RouteChanged(Route),
    ViewDetail(PostId),
    BackToHome,
    ListLoaded(Vec<Post>),
    ListFailed(Error),
    DetailLoaded(Post, Vec<Comment>),
    DetailFailed(Error),
    Submit(Submission),
    SubmitFailed(Error),
    PostCreated(Post),
    PostUpdated(Post),
    DeletePostRequested(PostId),
    PostDeleted(PostId),
    PostDeleteFailed(PostId, Error),
    EditComment(CommentId),
    ReplyTo(CommentId),
    CancelEdit,
    CommentCreated(Comment),
    CommentUpdated { previous: CommentId, comment: Comment },
    DeleteCommentRequested(CommentId),
    CommentDeleted(CommentId),
    CommentDeleteFailed(CommentId, Error),
}

/// Work the reducer asks the runtime to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Navigate(Route),
    LoadList,
    LoadDetail(PostId),
    ConfirmDeletePost(PostId),
    ConfirmDeleteComment { post_id: PostId, comment_id: CommentId },
    Submit(Submission),
    Notify(String),
}

pub fn reduce(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let mut effects = Vec::new();

    match msg {
        Msg::RouteChanged(Route::Home) => effects.push(Effect::LoadList),
        Msg::RouteChanged(Route::Post(id)) => effects.push(Effect::LoadDetail(id)),
        Msg::ViewDetail(id) => {
            effects.push(Effect::Navigate(Route::Post(id.clone())));
            effects.push(Effect::LoadDetail(id));
        }
        Msg::BackToHome => {
            effects.push(Effect::Navigate(Route::Home));
            effects.push(Effect::LoadList);
        }
        Msg::ListLoaded(mut posts) => {
            posts.reverse();
            state.posts = posts;
            state.current_post = None;
            state.comments.clear();
            state.close_boxes();
        }
        Msg::ListFailed(err) => {
            effects.push(Effect::Notify(format!("Could not load posts: {}", err)));
        }
        Msg::DetailLoaded(post, comments) => {
            state.posts = vec![post.clone()];
            state.current_post = Some(post);
            state.comments = comments;
            state.close_boxes();
        }
        Msg::DetailFailed(err) => {
            state = FeedState::default();
            effects.push(Effect::Notify(format!("Could not load the post: {}", err)));
        }
        Msg::Submit(submission) => effects.push(Effect::Submit(submission)),
        Msg::SubmitFailed(err) => {
            effects.push(Effect::Notify(format!("Could not save: {}", err)));
        }
        Msg::PostCreated(post) => state.posts.insert(0, post),
        Msg::PostUpdated(post) => {
            if let Some(current) = state.current_post.as_mut().filter(|current| current.id == post.id) {
                *current = post.clone();
            }
            if let Some(slot) = state.posts.iter_mut().find(|slot| slot.id == post.id) {
                *slot = post;
            }
        }
        Msg::DeletePostRequested(id) => effects.push(Effect::ConfirmDeletePost(id)),
        Msg::PostDeleted(id) => {
            let viewing_deleted = state
                .current_post
                .as_ref()
                .map_or(false, |current| current.id == id);
            state.posts.retain(|post| post.id != id);
            if viewing_deleted {
                state.current_post = None;
                state.comments.clear();
                state.close_boxes();
                effects.push(Effect::Navigate(Route::Home));
                effects.push(Effect::LoadList);
            }
        }
        Msg::PostDeleteFailed(id, err) => {
            effects.push(Effect::Notify(format!("Could not delete post {}: {}", id, err)));
        }
        Msg::EditComment(id) => {
            state.replying_to = None;
            state.editing = Some(id);
        }
        Msg::ReplyTo(id) => {
            state.editing = None;
            state.replying_to = Some(id);
        }
        Msg::CancelEdit => state.close_boxes(),
        Msg::CommentCreated(comment) => {
            state.comments.insert(0, comment);
            state.replying_to = None;
        }
        Msg::CommentUpdated { previous, comment } => {
            if comment.id != previous {
                state.comments.retain(|existing| existing.id != previous);
                state.comments.insert(0, comment);
            } else if let Some(slot) = state.comments.iter_mut().find(|slot| slot.id == comment.id) {
                *slot = comment;
            }
            state.editing = None;
        }
        Msg::DeleteCommentRequested(comment_id) => {
            if let Some(post) = &state.current_post {
                effects.push(Effect::ConfirmDeleteComment {
                    post_id: post.id.clone(),
                    comment_id,
                });
            }
        }
        Msg::CommentDeleted(id) => {
            state.comments.retain(|comment| comment.id != id);
            if state.editing.as_ref() == Some(&id) {
                state.editing = None;
            }
            if state.replying_to.as_ref() == Some(&id) {
                state.replying_to = None;
            }
        }
        Msg::CommentDeleteFailed(id, err) => {
            effects.push(Effect::Notify(format!("Could not delete comment {}: {}", id, err)));
        }
    }

    (state, effects)
}
