use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};

use snuggle_core::visitor::resolve_identifier;

/// Visitor identifier derived from request metadata.
///
/// Uses the first `X-Forwarded-For` entry, then the peer address from
/// [`ConnectInfo`], then `127.0.0.1`. Never rejects: `ConnectInfo` is only
/// present when the server is started with
/// `into_make_service_with_connect_info`, so its absence is not an error.
#[derive(Debug, Clone)]
pub struct ClientIdentifier(pub String);

impl<S> FromRequestParts<S> for ClientIdentifier
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded_for = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok());
        let remote_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(Self(resolve_identifier(forwarded_for, remote_addr)))
    }
}
