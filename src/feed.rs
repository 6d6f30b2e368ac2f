//! Runs the feed: applies messages to the view state and turns the
//! resulting effects into requests against the API.

use futures::future::{Either, Shared};
use futures::sync::oneshot;
use futures::Future;
use log::{debug, info, warn};
use tokio::runtime::Runtime;

use crate::client::ApiFuture;
use crate::comment::{CommentApi, CommentId};
use crate::composer::{Composer, Submission};
use crate::post::{PostApi, PostId};
use crate::route::Route;
use crate::state::{reduce, Effect, FeedState, Msg};

use std::collections::VecDeque;
use std::mem;

/// An in-flight request. Resolves to the message to dispatch next, or to
/// `None` once the feed that started it has been torn down.
pub type Task = Box<dyn Future<Item = Option<Msg>, Error = ()> + Send>;

/// Whatever hosts the feed: shows notices, asks yes/no questions and owns
/// the address bar.
pub trait Shell {
    fn notify(&self, message: &str);

    /// Blocks until the user answers.
    fn confirm(&self, prompt: &str) -> bool;

    fn navigate(&self, _route: &Route) {}
}

pub struct Feed<A, S> {
    api: A,
    shell: S,
    state: FeedState,
    route: Route,
    teardown: Option<oneshot::Sender<()>>,
    torn_down: Shared<oneshot::Receiver<()>>,
}

impl<A, S> Feed<A, S>
where
    A: PostApi + CommentApi + Clone + Send + 'static,
    S: Shell,
{
    pub fn new(api: A, shell: S) -> Self {
        let (teardown, torn_down) = oneshot::channel();
        Feed {
            api,
            shell,
            state: FeedState::default(),
            route: Route::Home,
            teardown: Some(teardown),
            torn_down: torn_down.shared(),
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_none()
    }

    /// Cancels every request this feed still has in flight. Afterwards
    /// `dispatch` ignores everything.
    pub fn teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            debug!("tearing down feed at {}", self.route);
            let _ = teardown.send(());
        }
    }

    pub fn dispatch(&mut self, msg: Msg) -> Vec<Task> {
        if self.is_torn_down() {
            debug!("feed torn down, ignoring {:?}", msg);
            return Vec::new();
        }

        if let Msg::RouteChanged(route) = &msg {
            info!("route changed to {}", route);
            self.route = route.clone();
        }

        let state = mem::take(&mut self.state);
        let (state, effects) = reduce(state, msg);
        self.state = state;

        effects
            .into_iter()
            .filter_map(|effect| self.perform(effect))
            .collect()
    }

    /// Validates the composer and sends its request. Invalid input is
    /// reported to the shell without touching the network.
    pub fn submit(&mut self, composer: &Composer) -> Vec<Task> {
        match composer.submission() {
            Ok(submission) => self.dispatch(Msg::Submit(submission)),
            Err(err) => {
                if !self.is_torn_down() {
                    let message = err.to_string();
                    warn!("{}", message);
                    self.shell.notify(&message);
                }
                Vec::new()
            }
        }
    }

    /// Dispatches `msg` and blocks on `runtime` until every request it
    /// caused, directly or through follow-up messages, has completed.
    pub fn settle(&mut self, runtime: &mut Runtime, msg: Msg) {
        let tasks = self.dispatch(msg);
        self.drive(runtime, tasks);
    }

    pub fn drive(&mut self, runtime: &mut Runtime, tasks: Vec<Task>) {
        let mut pending: VecDeque<Task> = tasks.into();
        while let Some(task) = pending.pop_front() {
            if let Ok(Some(msg)) = runtime.block_on(task) {
                pending.extend(self.dispatch(msg));
            }
        }
    }

    fn perform(&mut self, effect: Effect) -> Option<Task> {
        match effect {
            Effect::Navigate(route) => {
                info!("navigating to {}", route);
                self.shell.navigate(&route);
                self.route = route;
                None
            }
            Effect::Notify(message) => {
                warn!("{}", message);
                self.shell.notify(&message);
                None
            }
            Effect::LoadList => Some(self.guard(load_list(&self.api))),
            Effect::LoadDetail(id) => Some(self.guard(load_detail(&self.api, id))),
            Effect::ConfirmDeletePost(id) => {
                if !self.shell.confirm(&format!("Delete post {}?", id)) {
                    return None;
                }
                Some(self.guard(delete_post(&self.api, id)))
            }
            Effect::ConfirmDeleteComment {
                post_id,
                comment_id,
            } => {
                if !self.shell.confirm(&format!("Delete comment {}?", comment_id)) {
                    return None;
                }
                Some(self.guard(delete_comment(&self.api, post_id, comment_id)))
            }
            Effect::Submit(submission) => Some(self.guard(submit(&self.api, submission))),
        }
    }

    fn guard<F>(&self, work: F) -> Task
    where
        F: Future<Item = Msg, Error = ()> + Send + 'static,
    {
        Box::new(
            work.select2(self.torn_down.clone())
                .then(|outcome| match outcome {
                    Ok(Either::A((msg, _))) => Ok::<_, ()>(Some(msg)),
                    Ok(Either::B(_)) | Err(Either::B(_)) => {
                        debug!("feed torn down, dropping in-flight request");
                        Ok(None)
                    }
                    Err(Either::A(_)) => Ok(None),
                }),
        )
    }
}

fn load_list<A: PostApi>(api: &A) -> impl Future<Item = Msg, Error = ()> + Send {
    api.list_posts().then(|result| {
        Ok::<_, ()>(match result {
            Ok(posts) => Msg::ListLoaded(posts),
            Err(err) => Msg::ListFailed(err),
        })
    })
}

/// The post and then its comments. Either failing fails the whole load.
fn load_detail<A>(api: &A, id: PostId) -> impl Future<Item = Msg, Error = ()> + Send
where
    A: PostApi + CommentApi + Clone + Send + 'static,
{
    let comment_api = api.clone();
    api.get_post(&id)
        .and_then(move |post| {
            comment_api
                .list_comments(&id)
                .map(move |comments| (post, comments))
        })
        .then(|result| {
            Ok::<_, ()>(match result {
                Ok((post, comments)) => Msg::DetailLoaded(post, comments),
                Err(err) => Msg::DetailFailed(err),
            })
        })
}

fn delete_post<A: PostApi>(api: &A, id: PostId) -> impl Future<Item = Msg, Error = ()> + Send {
    api.delete_post(&id).then(move |result| {
        Ok::<_, ()>(match result {
            Ok(_) => Msg::PostDeleted(id),
            Err(err) => Msg::PostDeleteFailed(id, err),
        })
    })
}

fn delete_comment<A: CommentApi>(
    api: &A,
    post_id: PostId,
    comment_id: CommentId,
) -> impl Future<Item = Msg, Error = ()> + Send {
    api.delete_comment(&post_id, &comment_id).then(move |result| {
        Ok::<_, ()>(match result {
            Ok(_) => Msg::CommentDeleted(comment_id),
            Err(err) => Msg::CommentDeleteFailed(comment_id, err),
        })
    })
}

fn submit<A>(api: &A, submission: Submission) -> impl Future<Item = Msg, Error = ()> + Send
where
    A: PostApi + CommentApi + Clone + Send + 'static,
{
    let done: ApiFuture<Msg> = match submission {
        Submission::CreatePost(draft) => Box::new(api.create_post(&draft).map(Msg::PostCreated)),
        Submission::UpdatePost(id, draft) => {
            Box::new(api.update_post(&id, &draft).map(Msg::PostUpdated))
        }
        Submission::CreateComment(post_id, draft) => {
            Box::new(api.create_comment(&post_id, &draft).map(Msg::CommentCreated))
        }
        Submission::UpdateComment {
            post_id,
            original,
            content,
        } => {
            let previous = original.id.clone();
            Box::new(
                api.update_comment(&post_id, &original, &content)
                    .map(move |comment| Msg::CommentUpdated { previous, comment }),
            )
        }
    };

    done.then(|result| Ok::<_, ()>(result.unwrap_or_else(Msg::SubmitFailed)))
}
