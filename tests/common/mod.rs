#![allow(dead_code)]

use futures::{future, Future, Stream};
use hyper::service::service_fn;
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde_json::Value;
use tokio::runtime::Runtime;
use url::Url;

use feed_client::client::ApiFuture;
use feed_client::comment::CommentDraft;
use feed_client::post::PostDraft;
use feed_client::{Comment, CommentApi, CommentId, Error, Post, PostApi, PostId, Route, Shell};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ===========================================================================
// Scripted HTTP server
// ===========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl Recorded {
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Replies = HashMap<(String, String), (u16, String)>;

/// Local API stand-in. Answers from a table keyed by method and path and
/// records every request it sees; unscripted requests get a 404.
pub struct MockServer {
    pub url: Url,
    requests: Arc<Mutex<Vec<Recorded>>>,
    replies: Arc<Mutex<Replies>>,
}

impl MockServer {
    pub fn start(rt: &mut Runtime) -> MockServer {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let replies: Arc<Mutex<Replies>> = Arc::new(Mutex::new(HashMap::new()));

        let addr = ([127, 0, 0, 1], 0).into();
        let (seen, table) = (requests.clone(), replies.clone());
        let server = Server::bind(&addr).serve(move || {
            let seen = seen.clone();
            let table = table.clone();
            service_fn(move |req: Request<Body>| {
                let seen = seen.clone();
                let table = table.clone();
                let method = req.method().to_string();
                let path = req.uri().path().to_string();

                req.into_body().concat2().map(move |body| {
                    seen.lock().unwrap().push(Recorded {
                        method: method.clone(),
                        path: path.clone(),
                        body: String::from_utf8_lossy(&body).into_owned(),
                    });
                    let (status, reply) = table
                        .lock()
                        .unwrap()
                        .get(&(method, path))
                        .cloned()
                        .unwrap_or_else(|| (404, "\"Not found\"".to_string()));

                    Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(Body::from(reply))
                        .unwrap()
                })
            })
        });

        let url = Url::parse(&format!("http://{}/", server.local_addr())).unwrap();
        rt.spawn(server.map_err(|err| eprintln!("mock server failed: {}", err)));

        MockServer {
            url,
            requests,
            replies,
        }
    }

    pub fn reply(&self, method: &str, path: &str, status: u16, body: Value) {
        self.reply_raw(method, path, status, &body.to_string());
    }

    pub fn reply_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.replies.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.requests().iter().map(Recorded::line).collect()
    }
}

// ===========================================================================
// Fixtures
// ===========================================================================

pub fn post(id: &str) -> Post {
    Post {
        id: PostId::from(id),
        title: String::new(),
        content: format!("post {}", id),
        name: "Ada".to_string(),
        avatar: "https://example.com/ada.png".to_string(),
        created_at: "2024-06-03T10:00:00.000Z".to_string(),
    }
}

pub fn comment(id: &str, post_id: &str) -> Comment {
    Comment {
        id: CommentId::from(id),
        content: format!("comment {}", id),
        name: "Grace".to_string(),
        avatar: "https://example.com/grace.png".to_string(),
        created_at: "2024-06-03T11:00:00.000Z".to_string(),
        parent_id: Some(PostId::from(post_id)),
    }
}

pub fn post_ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|post| post.id.as_str()).collect()
}

pub fn comment_ids(comments: &[Comment]) -> Vec<&str> {
    comments.iter().map(|comment| comment.id.as_str()).collect()
}

// ===========================================================================
// In-memory API
// ===========================================================================

#[derive(Default)]
struct Store {
    posts: Vec<Post>,
    comments: HashMap<PostId, Vec<Comment>>,
    failing: Vec<&'static str>,
    hanging: bool,
    calls: Vec<String>,
    next_id: u32,
}

/// In-memory stand-in for the remote API. Operations named in `fail` answer
/// with a 500; `hang` makes every call stay pending forever.
#[derive(Clone, Default)]
pub struct FakeApi {
    store: Arc<Mutex<Store>>,
}

fn server_error(method: Method, url: String) -> Error {
    Error::Status {
        method,
        url,
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "fake failure".to_string(),
    }
}

fn not_found(method: Method, url: String) -> Error {
    Error::Status {
        method,
        url,
        status: StatusCode::NOT_FOUND,
        body: "\"Not found\"".to_string(),
    }
}

impl FakeApi {
    pub fn with_posts(posts: Vec<Post>) -> FakeApi {
        let api = FakeApi::default();
        api.store.lock().unwrap().posts = posts;
        api
    }

    pub fn set_comments(&self, post_id: &str, comments: Vec<Comment>) {
        self.store
            .lock()
            .unwrap()
            .comments
            .insert(PostId::from(post_id), comments);
    }

    pub fn fail(&self, operation: &'static str) {
        self.store.lock().unwrap().failing.push(operation);
    }

    pub fn hang(&self) {
        self.store.lock().unwrap().hanging = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn comments_of(&self, post_id: &str) -> Vec<Comment> {
        self.store
            .lock()
            .unwrap()
            .comments
            .get(&PostId::from(post_id))
            .cloned()
            .unwrap_or_default()
    }

    fn call<T, F>(&self, operation: &'static str, method: Method, path: String, answer: F) -> ApiFuture<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Store) -> Result<T, Error>,
    {
        let mut store = self.store.lock().unwrap();
        store.calls.push(format!("{} {}", method, path));
        if store.hanging {
            return Box::new(future::empty());
        }
        if store.failing.contains(&operation) {
            return Box::new(future::err(server_error(method, path)));
        }
        Box::new(future::result(answer(&mut *store)))
    }
}

impl PostApi for FakeApi {
    fn list_posts(&self) -> ApiFuture<Vec<Post>> {
        self.call("list_posts", Method::GET, "post".to_string(), |store| {
            Ok(store.posts.clone())
        })
    }

    fn get_post(&self, id: &PostId) -> ApiFuture<Post> {
        let path = format!("post/{}", id);
        let id = id.clone();
        let missing = path.clone();
        self.call("get_post", Method::GET, path, move |store| {
            store
                .posts
                .iter()
                .find(|post| post.id == id)
                .cloned()
                .ok_or_else(|| not_found(Method::GET, missing))
        })
    }

    fn create_post(&self, draft: &PostDraft) -> ApiFuture<Post> {
        let draft = draft.clone();
        self.call("create_post", Method::POST, "post".to_string(), move |store| {
            store.next_id += 1;
            let post = Post {
                id: PostId::from(format!("p{}", store.next_id)),
                title: draft.title.unwrap_or_default(),
                content: draft.content.unwrap_or_default(),
                name: draft.name.unwrap_or_default(),
                avatar: draft.avatar.unwrap_or_default(),
                created_at: draft.created_at.unwrap_or_default(),
            };
            store.posts.push(post.clone());
            Ok(post)
        })
    }

    fn update_post(&self, id: &PostId, draft: &PostDraft) -> ApiFuture<Post> {
        let path = format!("post/{}", id);
        let (id, draft, missing) = (id.clone(), draft.clone(), path.clone());
        self.call("update_post", Method::PUT, path, move |store| {
            let post = store
                .posts
                .iter_mut()
                .find(|post| post.id == id)
                .ok_or_else(|| not_found(Method::PUT, missing))?;
            if let Some(content) = draft.content {
                post.content = content;
            }
            if let Some(created_at) = draft.created_at {
                post.created_at = created_at;
            }
            Ok(post.clone())
        })
    }

    fn delete_post(&self, id: &PostId) -> ApiFuture<Value> {
        let path = format!("post/{}", id);
        let id = id.clone();
        self.call("delete_post", Method::DELETE, path, move |store| {
            store.posts.retain(|post| post.id != id);
            Ok(serde_json::json!({ "id": id.as_str() }))
        })
    }
}

impl CommentApi for FakeApi {
    fn list_comments(&self, post_id: &PostId) -> ApiFuture<Vec<Comment>> {
        let path = format!("post/{}/comment", post_id);
        let post_id = post_id.clone();
        self.call("list_comments", Method::GET, path, move |store| {
            Ok(store.comments.get(&post_id).cloned().unwrap_or_default())
        })
    }

    fn create_comment(&self, post_id: &PostId, draft: &CommentDraft) -> ApiFuture<Comment> {
        let path = format!("post/{}/comment", post_id);
        let (post_id, draft) = (post_id.clone(), draft.clone());
        self.call("create_comment", Method::POST, path, move |store| {
            store.next_id += 1;
            let comment = Comment {
                id: CommentId::from(format!("n{}", store.next_id)),
                content: draft.content.unwrap_or_default(),
                name: draft.name.unwrap_or_default(),
                avatar: draft.avatar.unwrap_or_default(),
                created_at: draft.created_at.unwrap_or_default(),
                parent_id: draft.parent_id.unwrap_or(None),
            };
            store
                .comments
                .entry(post_id)
                .or_insert_with(Vec::new)
                .push(comment.clone());
            Ok(comment)
        })
    }

    fn update_comment_in_place(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        _draft: &CommentDraft,
    ) -> ApiFuture<Comment> {
        let path = format!("post/{}/comment/{}", post_id, comment_id);
        let missing = path.clone();
        self.call("update_comment_in_place", Method::PUT, path, move |_| {
            Err(not_found(Method::PUT, missing))
        })
    }

    fn delete_comment(&self, post_id: &PostId, comment_id: &CommentId) -> ApiFuture<Value> {
        let path = format!("post/{}/comment/{}", post_id, comment_id);
        let (post_id, comment_id) = (post_id.clone(), comment_id.clone());
        self.call("delete_comment", Method::DELETE, path, move |store| {
            if let Some(comments) = store.comments.get_mut(&post_id) {
                comments.retain(|comment| comment.id != comment_id);
            }
            Ok(serde_json::json!({ "id": comment_id.as_str() }))
        })
    }
}

// ===========================================================================
// Shell
// ===========================================================================

/// Remembers notices, prompts and navigation; answers prompts with `answer`.
pub struct RecordingShell {
    pub answer: Cell<bool>,
    pub notices: RefCell<Vec<String>>,
    pub prompts: RefCell<Vec<String>>,
    pub routes: RefCell<Vec<Route>>,
}

impl RecordingShell {
    pub fn answering(answer: bool) -> RecordingShell {
        RecordingShell {
            answer: Cell::new(answer),
            notices: RefCell::new(Vec::new()),
            prompts: RefCell::new(Vec::new()),
            routes: RefCell::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }
}

impl Shell for RecordingShell {
    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer.get()
    }

    fn navigate(&self, route: &Route) {
        self.routes.borrow_mut().push(route.clone());
    }
}
