//! Correlation ids shared by the server and the profile client.
//!
//! The server stamps each request with `x-request-id`, keeping one the caller
//! already sent, and echoes it on the response. The client logs it next to
//! failed calls so they can be matched with server spans.

use axum::http::{HeaderMap, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

/// `(set, propagate)` pair. `set` must wrap the trace layer so spans carry the id.
pub fn request_id_layer() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    let name = HeaderName::from_static(X_REQUEST_ID);
    let set = SetRequestIdLayer::new(name.clone(), MakeRequestUuid);

    (set, PropagateRequestIdLayer::new(name))
}

/// Correlation id carried by a header map, if it is present and readable text.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> Option<&str> {
        self.get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|id| !id.is_empty())
    }
}
