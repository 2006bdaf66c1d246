//! Backend endpoint resolution.
//!
//! All request and stream URLs are derived from one [`Endpoint`]. In
//! development mode the host is fixed to [`DEV_HOST`]; in production the
//! configured server address is used.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use url::Url;

use procdeck_core::prelude::*;

/// Host the supervisor listens on during local development.
pub const DEV_HOST: &str = "localhost:8080";

/// Characters left unescaped in a path segment (same set as
/// `encodeURIComponent`).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which backend host to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Dev,
    Prod,
}

impl Mode {
    /// `Dev` for debug builds, `Prod` for release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Mode::Dev
        } else {
            Mode::Prod
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::for_build()
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Dev => f.write_str("dev"),
            Mode::Prod => f.write_str("prod"),
        }
    }
}

/// Resolved base address of the supervisor backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    /// Resolve the backend address for `mode`.
    ///
    /// `address` may be a bare `host:port` (combined with `scheme`) or a full
    /// `http(s)://` URL.
    pub fn resolve(mode: Mode, scheme: &str, address: &str) -> Result<Self> {
        let host = match mode {
            Mode::Dev => DEV_HOST,
            Mode::Prod => address.trim(),
        };
        if host.is_empty() {
            return Err(Error::endpoint("server address is empty"));
        }

        let raw = if host.contains("://") {
            host.to_string()
        } else {
            format!("{scheme}://{host}")
        };

        let base = Url::parse(&raw).map_err(|e| Error::endpoint(format!("{raw}: {e}")))?;
        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::endpoint(format!(
                    "unsupported scheme '{other}' (expected http or https)"
                )))
            }
        }
        if base.host_str().is_none() {
            return Err(Error::endpoint(format!("{raw}: missing host")));
        }

        Ok(Self { base })
    }

    /// `host[:port]` for display in the header.
    pub fn authority(&self) -> String {
        match (self.base.host_str(), self.base.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => String::new(),
        }
    }

    pub fn is_secure(&self) -> bool {
        self.base.scheme() == "https"
    }

    /// HTTP URL for an API path. Each segment is percent-encoded.
    pub fn http_url(&self, segments: &[&str]) -> String {
        let scheme = if self.is_secure() { "https" } else { "http" };
        self.url_with_scheme(scheme, segments)
    }

    /// WebSocket URL for an API path. `https` backends yield `wss`.
    pub fn ws_url(&self, segments: &[&str]) -> String {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        self.url_with_scheme(scheme, segments)
    }

    fn url_with_scheme(&self, scheme: &str, segments: &[&str]) -> String {
        let mut url = format!("{scheme}://{}", self.authority());
        let prefix = self.base.path().trim_end_matches('/');
        url.push_str(prefix);
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, SEGMENT));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_mode_uses_fixed_host() {
        let ep = Endpoint::resolve(Mode::Dev, "http", "10.0.0.5:7798").unwrap();
        assert_eq!(ep.authority(), "localhost:8080");
        assert_eq!(ep.http_url(&["api", "service"]), "http://localhost:8080/api/service");
    }

    #[test]
    fn test_prod_mode_uses_configured_address() {
        let ep = Endpoint::resolve(Mode::Prod, "http", "10.0.0.5:7798").unwrap();
        assert_eq!(ep.authority(), "10.0.0.5:7798");
        assert_eq!(
            ep.ws_url(&["api", "service", "svc1", "output"]),
            "ws://10.0.0.5:7798/api/service/svc1/output"
        );
    }

    #[test]
    fn test_https_yields_wss() {
        let ep = Endpoint::resolve(Mode::Prod, "https", "deck.example.com").unwrap();
        assert!(ep.is_secure());
        assert_eq!(
            ep.ws_url(&["api", "service", "a", "output"]),
            "wss://deck.example.com/api/service/a/output"
        );
    }

    #[test]
    fn test_full_url_address_overrides_scheme() {
        let ep = Endpoint::resolve(Mode::Prod, "http", "https://deck.example.com:9443").unwrap();
        assert_eq!(ep.http_url(&["api"]), "https://deck.example.com:9443/api");
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let ep = Endpoint::resolve(Mode::Prod, "http", "host:1").unwrap();
        assert_eq!(
            ep.http_url(&["api", "service", "my svc/1", "log", "a#b?.log"]),
            "http://host:1/api/service/my%20svc%2F1/log/a%23b%3F.log"
        );
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let err = Endpoint::resolve(Mode::Prod, "ftp", "host:1").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_rejects_empty_address() {
        assert!(Endpoint::resolve(Mode::Prod, "http", "  ").is_err());
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let m: Mode = serde_json::from_str("\"prod\"").unwrap();
        assert_eq!(m, Mode::Prod);
        assert_eq!(serde_json::to_string(&Mode::Dev).unwrap(), "\"dev\"");
    }
}
