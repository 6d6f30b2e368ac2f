//! The compose/edit box: what it starts with, what it accepts and which
//! request it turns into.

use crate::avatar::FALLBACK_AVATAR;
use crate::comment::{Comment, CommentDraft, CommentId};
use crate::post::{Post, PostDraft, PostId};

use std::error::Error as StdError;
use std::fmt;

pub const DEFAULT_AUTHOR_NAME: &str = "Demo User";

/// Name and avatar a fresh composer is filled with.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

impl Default for Author {
    fn default() -> Self {
        Author {
            name: DEFAULT_AUTHOR_NAME.to_string(),
            avatar: FALLBACK_AVATAR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposeMode {
    Post,
    Comment(PostId),
    ReplyComment { post_id: PostId, comment_id: CommentId },
    EditPost(Post),
    EditComment { post_id: PostId, comment: Comment },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyContent,
    EmptyName,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::EmptyContent => write!(f, "content cannot be empty"),
            ValidationError::EmptyName => write!(f, "please enter your name"),
        }
    }
}

impl StdError for ValidationError {}

/// A validated request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    CreatePost(PostDraft),
    UpdatePost(PostId, PostDraft),
    CreateComment(PostId, CommentDraft),
    UpdateComment {
        post_id: PostId,
        original: Comment,
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composer {
    mode: ComposeMode,
    pub name: String,
    pub avatar: String,
    pub content: String,
}

impl Composer {
    pub fn new(mode: ComposeMode, author: &Author) -> Self {
        let mut composer = Composer {
            mode,
            name: String::new(),
            avatar: String::new(),
            content: String::new(),
        };
        composer.reset(author);
        composer
    }

    pub fn mode(&self) -> &ComposeMode {
        &self.mode
    }

    /// Edit modes start from the edited item, the others from `author`.
    pub fn reset(&mut self, author: &Author) {
        let (content, name, avatar) = match &self.mode {
            ComposeMode::EditPost(post) => (&post.content, &post.name, &post.avatar),
            ComposeMode::EditComment { comment, .. } => {
                (&comment.content, &comment.name, &comment.avatar)
            }
            _ => {
                self.content.clear();
                self.name = author.name.clone();
                self.avatar = author.avatar.clone();
                return;
            }
        };
        self.content = content.clone();
        self.name = name.clone();
        self.avatar = avatar.clone();
    }

    pub fn submission(&self) -> Result<Submission, ValidationError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        let needs_name = match self.mode {
            ComposeMode::Post | ComposeMode::Comment(_) | ComposeMode::ReplyComment { .. } => true,
            ComposeMode::EditPost(_) | ComposeMode::EditComment { .. } => false,
        };
        if needs_name && self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let submission = match &self.mode {
            ComposeMode::Post => Submission::CreatePost(PostDraft {
                title: Some(String::new()),
                content: Some(content.to_string()),
                name: Some(self.name.trim().to_string()),
                avatar: Some(self.avatar.clone()),
                created_at: Some(crate::timestamp()),
            }),
            ComposeMode::Comment(post_id) | ComposeMode::ReplyComment { post_id, .. } => {
                Submission::CreateComment(
                    post_id.clone(),
                    CommentDraft {
                        content: Some(content.to_string()),
                        name: Some(self.name.trim().to_string()),
                        avatar: Some(self.avatar.clone()),
                        created_at: Some(crate::timestamp()),
                        parent_id: Some(Some(post_id.clone())),
                    },
                )
            }
            ComposeMode::EditPost(post) => Submission::UpdatePost(
                post.id.clone(),
                PostDraft {
                    title: Some(String::new()),
                    content: Some(content.to_string()),
                    name: Some(self.name.clone()),
                    avatar: Some(self.avatar.clone()),
                    created_at: Some(crate::timestamp()),
                },
            ),
            ComposeMode::EditComment { post_id, comment } => Submission::UpdateComment {
                post_id: post_id.clone(),
                original: comment.clone(),
                content: content.to_string(),
            },
        };

        Ok(submission)
    }
}
