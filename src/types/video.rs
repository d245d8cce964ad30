use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::config::HostConfig;

/// Opaque identifier of a video, taken from the watch URL's query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the video id from `url` if it is a watch page of the host site.
    ///
    /// Returns `None` for other hosts, other paths, unparsable URLs, and watch
    /// URLs without a non-empty video parameter.
    pub fn from_watch_url(url: &str, host: &HostConfig) -> Option<Self> {
        if !is_watch_page(url, host) {
            return None;
        }
        let parsed = Url::parse(url).ok()?;
        parsed
            .query_pairs()
            .find(|(k, _)| k == host.video_param.as_str())
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
            .map(VideoId)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `url` is an http(s) page on the host site or one of its subdomains.
pub fn is_host_page(url: &str, host: &HostConfig) -> bool {
    host_page_path(url, host).is_some()
}

/// True when `url` points at the host site's watch path.
pub fn is_watch_page(url: &str, host: &HostConfig) -> bool {
    host_page_path(url, host).is_some_and(|path| path == host.watch_path)
}

fn host_page_path(url: &str, host: &HostConfig) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    let hostname = parsed.host_str()?;
    let on_host = hostname == host.domain || hostname.ends_with(&format!(".{}", host.domain));
    on_host.then(|| parsed.path().to_string())
}

/// Metadata the page agent reads from a watch page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoInfo {
    pub title: String,
    pub url: String,
}
