//! Derives the room socket endpoint from the page the client was started for.
//!
//! The socket lives next to the room page: same host, same port, same path,
//! with `/ws` appended. The scheme mirrors the page's scheme, upgraded to its
//! WebSocket counterpart.

use url::Url;

use crate::TransportError;

/// Path segment appended to the room page path.
pub const SOCKET_SUFFIX: &str = "ws";

/// Maps a room page URL to its WebSocket endpoint.
///
/// `https://host:8443/room/abc` → `wss://host:8443/room/abc/ws`
///
/// Query strings and fragments are dropped. Schemes already in the
/// WebSocket family are kept as they are.
///
/// # Errors
/// Returns [`TransportError::InvalidEndpoint`] for pages that are neither
/// `http(s)` nor `ws(s)`, or that have no host.
pub fn socket_url(page: &Url) -> Result<Url, TransportError> {
    let scheme = match page.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(TransportError::InvalidEndpoint(format!(
                "unsupported page scheme {other:?}"
            )));
        }
    };
    if page.host_str().is_none() {
        return Err(TransportError::InvalidEndpoint(format!(
            "page {page} has no host"
        )));
    }

    let path = page.path().trim_end_matches('/');
    let mut endpoint = page.clone();
    endpoint.set_query(None);
    endpoint.set_fragment(None);
    endpoint.set_path(&format!("{path}/{SOCKET_SUFFIX}"));
    // `set_scheme` refuses to switch between "special" and non-special
    // schemes, but http→ws and https→wss are both special, so this holds.
    endpoint.set_scheme(scheme).map_err(|()| {
        TransportError::InvalidEndpoint(format!("cannot use scheme {scheme} for {page}"))
    })?;
    Ok(endpoint)
}
