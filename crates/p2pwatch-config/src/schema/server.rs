use serde::{Deserialize, Serialize};

/// Location of the node whose session state is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Node base URL, e.g. `http://127.0.0.1:3000`.
    pub base_url: String,
    /// Path of the one-shot state endpoint.
    pub state_path: String,
    /// Path of the server-sent events stream.
    pub stream_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".into(),
            state_path: "/api/state".into(),
            stream_path: "/p2p/sse".into(),
        }
    }
}

impl ServerConfig {
    pub fn state_url(&self) -> String {
        join_url(&self.base_url, &self.state_path)
    }

    pub fn stream_url(&self) -> String {
        join_url(&self.base_url, &self.stream_path)
    }
}

/// Join a base URL and a path with exactly one `/` between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_urls() {
        let server = ServerConfig::default();
        assert_eq!(server.state_url(), "http://127.0.0.1:3000/api/state");
        assert_eq!(server.stream_url(), "http://127.0.0.1:3000/p2p/sse");
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_url("http://h:1/", "/a"), "http://h:1/a");
        assert_eq!(join_url("http://h:1", "a"), "http://h:1/a");
        assert_eq!(join_url("http://h:1//", "p2p/sse"), "http://h:1/p2p/sse");
    }
}
