use url::Url;

use crate::client::{Client, Error};
use crate::composer::Author;

use std::env;

pub const DEFAULT_API_URL: &str = "https://665de6d7e88051d60408c32d.mockapi.io/";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root the `post` collection lives under.
    pub api_url: Url,
    /// Defaults for new posts and comments.
    pub author: Author,
}

impl Config {
    /// Reads `FEED_API_URL`, `FEED_AUTHOR_NAME` and `FEED_AUTHOR_AVATAR`,
    /// after loading `.env` if there is one.
    pub fn from_env() -> Result<Config, Error> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url: Url = lookup("FEED_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .parse()?;

        let defaults = Author::default();
        let author = Author {
            name: lookup("FEED_AUTHOR_NAME").unwrap_or(defaults.name),
            avatar: lookup("FEED_AUTHOR_AVATAR").unwrap_or(defaults.avatar),
        };

        Ok(Config { api_url, author })
    }

    pub fn client(&self) -> Result<Client, Error> {
        Client::new(self.api_url.clone())
    }
}
