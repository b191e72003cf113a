use std::env;

use url::Url;

use crate::{DEFAULT_SERVER_PORT, SERVER_PORT_ENV};

pub(crate) fn resolve_server_port() -> u16 {
    env::var(SERVER_PORT_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Base URL the window navigates to and the readiness probe targets.
pub(crate) fn server_url_for_port(port: u16) -> String {
    let raw = format!("http://localhost:{port}/");
    match Url::parse(&raw) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_for_port_builds_localhost_url_with_trailing_slash() {
        assert_eq!(server_url_for_port(5678), "http://localhost:5678/");
        assert_eq!(server_url_for_port(80), "http://localhost/");
    }
}
