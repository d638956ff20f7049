use std::path::PathBuf;

use anyhow::{bail, Result};
use url::Url;

/// One blog post whose view counter we follow.
#[derive(Debug, Clone)]
pub struct TrackedPost {
    /// Short identifier used to build the record field name (`<key>_views`).
    pub key: String,
    pub url: String,
    /// Human-readable name for logs and the standings report.
    pub label: String,
    /// Offset applied to the raw count when ranking, never when recording.
    pub handicap: Option<i64>,
}

impl TrackedPost {
    pub fn new(key: &str, url: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            url: url.to_string(),
            label: label.to_string(),
            handicap: None,
        }
    }

    pub fn with_handicap(mut self, handicap: i64) -> Self {
        self.handicap = Some(handicap);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub posts: Vec<TrackedPost>,
    pub data_file: PathBuf,
}

impl TrackerConfig {
    pub fn new(data_file: PathBuf) -> Self {
        Self {
            posts: default_posts(),
            data_file,
        }
    }

    /// Reject configurations the update pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.posts.is_empty() {
            bail!("no posts configured");
        }

        for (i, post) in self.posts.iter().enumerate() {
            if self.posts[..i].iter().any(|p| p.key == post.key) {
                bail!("duplicate post key '{}'", post.key);
            }

            let parsed = match Url::parse(&post.url) {
                Ok(parsed) => parsed,
                Err(e) => bail!("invalid URL for '{}': {e}", post.key),
            };
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "unsupported scheme '{}' for '{}', expected http or https",
                    parsed.scheme(),
                    post.key
                );
            }
        }

        Ok(())
    }
}

/// The two posts this tool exists to race against each other.
fn default_posts() -> Vec<TrackedPost> {
    vec![
        TrackedPost::new(
            "mike",
            "https://blogs.mathworks.com/matlab/?p=4045",
            "Mike",
        ),
        TrackedPost::new(
            "yann",
            "https://blogs.mathworks.com/deep-learning/?p=18818",
            "Yann",
        )
        .with_handicap(-200),
    ]
}
