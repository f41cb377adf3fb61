use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::error::HttpError;
use crate::application::syndication::{FeedSource, RenderedFeed, SyndicationService};

use super::middleware::{log_responses, set_request_context};

/// Response header telling whether a feed came from the cache or a live render.
pub const FEED_SOURCE_HEADER: &str = "x-feed-source";

#[derive(Clone)]
pub struct HttpState {
    pub syndication: Arc<SyndicationService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/rss/{segment}", get(feed))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn feed(State(state): State<HttpState>, Path(segment): Path<String>) -> Response {
    match state.syndication.feed(&segment).await {
        Ok(rendered) => feed_response(rendered),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

async fn fallback() -> Response {
    HttpError::new(
        "infra::http::public::fallback",
        StatusCode::NOT_FOUND,
        "Not found",
        "No route matches the request path",
    )
    .into_response()
}

fn feed_response(feed: RenderedFeed) -> Response {
    let source = match feed.source {
        FeedSource::Cache => "cache",
        FeedSource::Live => "live",
    };
    xml_response(feed.body, feed.format.content_type(), source)
}

fn xml_response(body: String, content_type: &str, source: &'static str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, format!("{content_type}; charset=utf-8"))
        .header(FEED_SOURCE_HEADER, source)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
