mod middleware;
mod public;

pub use public::{FEED_SOURCE_HEADER, HttpState, build_router};
