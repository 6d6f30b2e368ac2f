use futures::{future, Future, Stream};
use hyper;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Client as HyperClient, Method, Request, StatusCode, Uri};
use hyper_rustls::HttpsConnector;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json;
use url::{self, Url};

use std::error::Error as StdError;
use std::fmt;

const DNS_WORKER_THREADS: usize = 4;

/// Boxed future returned by every remote operation.
pub type ApiFuture<T> = Box<dyn Future<Item = T, Error = Error> + Send>;

#[derive(Debug)]
pub enum Error {
    Hyper(hyper::Error),
    Http(hyper::http::Error),
    Uri(hyper::http::uri::InvalidUri),
    Json(serde_json::Error),
    Url(url::ParseError),
    InvalidUrl,
    /// The API answered with a non-success status. The body is kept verbatim.
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Hyper(err) => write!(f, "transport error: {}", err),
            Error::Http(err) => write!(f, "invalid request: {}", err),
            Error::Uri(err) => write!(f, "invalid uri: {}", err),
            Error::Json(err) => write!(f, "invalid json: {}", err),
            Error::Url(err) => write!(f, "invalid url: {}", err),
            Error::InvalidUrl => write!(f, "api url must be http or https"),
            Error::Status {
                method,
                url,
                status,
                body,
            } => {
                write!(f, "Http failure response for {} {}: {}", method, url, status)?;
                if !body.is_empty() {
                    write!(f, ": {}", body)?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Hyper(err) => Some(err),
            Error::Http(err) => Some(err),
            Error::Uri(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::InvalidUrl | Error::Status { .. } => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::Url(error)
    }
}

impl From<hyper::http::Error> for Error {
    fn from(error: hyper::http::Error) -> Self {
        Error::Http(error)
    }
}

impl From<hyper::http::uri::InvalidUri> for Error {
    fn from(error: hyper::http::uri::InvalidUri) -> Self {
        Error::Uri(error)
    }
}

impl From<hyper::Error> for Error {
    fn from(error: hyper::Error) -> Self {
        Error::Hyper(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}

#[derive(Clone)]
pub(crate) struct HttpClient {
    base_url: Url,
    hyper: HyperClient<HttpsConnector<hyper::client::HttpConnector>, hyper::Body>,
}

/// Client for the feed's REST API. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone)]
pub struct Client {
    pub(crate) http: HttpClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FeedClient({})", self.http.base_url)
    }
}

impl HttpClient {
    pub(crate) fn get<T>(&self, path: &str) -> ApiFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send(Method::GET, path, None)
    }

    pub(crate) fn delete<T>(&self, path: &str) -> ApiFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send(Method::DELETE, path, None)
    }

    pub(crate) fn post<B, T>(&self, path: &str, body: &B) -> ApiFuture<T>
    where
        B: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        match serde_json::to_vec(body) {
            Ok(body) => self.send(Method::POST, path, Some(body)),
            Err(err) => Box::new(future::err(Error::from(err))),
        }
    }

    pub(crate) fn put<B, T>(&self, path: &str, body: &B) -> ApiFuture<T>
    where
        B: Serialize,
        T: DeserializeOwned + Send + 'static,
    {
        match serde_json::to_vec(body) {
            Ok(body) => self.send(Method::PUT, path, Some(body)),
            Err(err) => Box::new(future::err(Error::from(err))),
        }
    }

    fn send<T>(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> ApiFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let prepared = self
            .base_url
            .join(path)
            .map_err(Error::from)
            .and_then(|url| build_request(&method, &url, body).map(|request| (url, request)));
        let client = self.hyper.clone();

        let response = future::result(prepared).and_then(move |(url, request)| {
            debug!("{} {}", method, url.as_str());
            client
                .request(request)
                .map_err(Error::from)
                .map(move |res| (method, url, res))
        });

        Box::new(
            response
                .and_then(|(method, url, res)| {
                    let status = res.status();
                    res.into_body()
                        .concat2()
                        .map_err(Error::from)
                        .map(move |body| (method, url, status, body))
                })
                .and_then(|(method, url, status, body)| {
                    if !status.is_success() {
                        return Err(Error::Status {
                            method,
                            url: url.as_str().to_string(),
                            status,
                            body: String::from_utf8_lossy(&body).into_owned(),
                        });
                    }
                    serde_json::from_slice::<T>(&body).map_err(Error::from)
                }),
        )
    }
}

fn build_request(method: &Method, url: &Url, body: Option<Vec<u8>>) -> Result<Request<Body>, Error> {
    let uri: Uri = url.as_str().parse()?;
    let has_body = body.is_some();

    let mut request = Request::new(body.map(Body::from).unwrap_or_else(Body::empty));
    *request.method_mut() = method.clone();
    *request.uri_mut() = uri;
    if has_body {
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(request)
}

impl Client {
    /// Build a client rooted at `url`, the API root the `post` collection
    /// lives under.
    pub fn new(url: Url) -> Result<Self, Error> {
        match url.scheme() {
            "http" | "https" => {}
            _ => return Err(Error::InvalidUrl),
        }

        // Relative joins only append below the root when the path ends in '/'
        let mut url = url;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let https = HttpsConnector::new(DNS_WORKER_THREADS);
        let client: HyperClient<_, hyper::Body> = HyperClient::builder().build(https);

        Ok(Client {
            http: HttpClient {
                base_url: url,
                hyper: client,
            },
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.http.base_url
    }
}
