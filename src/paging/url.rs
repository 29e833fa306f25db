//! A parsed absolute URL with the string views the page patterns need.

use url::{Position, Url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    url: Url,
}

impl ParsedUrl {
    /// Parse an absolute URL.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        Url::parse(input).ok().map(|url| Self { url })
    }

    #[must_use]
    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    /// The serialized URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host with its port when one is set.
    #[must_use]
    pub fn host(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        }
    }

    /// Byte offset where the path starts in [`as_str`](Self::as_str).
    #[must_use]
    pub fn path_start(&self) -> usize {
        self.url[..Position::BeforePath].len()
    }

    /// Byte offset where the path ends.
    #[must_use]
    pub fn path_end(&self) -> usize {
        self.url[..Position::AfterPath].len()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Path without `;` parameters and without leading or trailing slashes.
    #[must_use]
    pub fn trimmed_path(&self) -> &str {
        let path = self.url.path();
        let path = path.split_once(';').map_or(path, |(before, _)| before);
        path.trim_start_matches('/').trim_end_matches('/')
    }

    /// Non-empty components of the trimmed path.
    #[must_use]
    pub fn path_components(&self) -> Vec<&str> {
        let path = self.trimmed_path();
        if path.is_empty() {
            return Vec::new();
        }
        path.split('/').collect()
    }

    /// Raw `name=value` pairs of the query, in order.
    #[must_use]
    pub fn query_params(&self) -> Vec<(String, String)> {
        let Some(query) = self.url.query().filter(|q| !q.is_empty()) else {
            return Vec::new();
        };
        query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    }

    /// The URL with the first `name=value` query pair given a new value.
    #[must_use]
    pub fn replace_query_value(&self, name: &str, value: &str, replacement: &str) -> String {
        let s = self.as_str();
        let query_start = self.path_end();
        let from = format!("{name}={value}");
        let Some(found) = s[query_start..].find(&from) else {
            return s.to_string();
        };
        let at = query_start + found;
        format!("{}{name}={replacement}{}", &s[..at], &s[at + from.len()..])
    }

    /// Serialization without the fragment and without a trailing slash.
    #[must_use]
    pub fn without_fragment(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        trim_trailing_slash(url.as_str()).to_string()
    }
}

/// Strip one trailing `/`.
#[must_use]
pub fn trim_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}
