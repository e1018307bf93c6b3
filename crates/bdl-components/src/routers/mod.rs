//! Routers: components dispatching events to different destinations.

mod content_based;
mod splitter;

pub use content_based::ContentBased;
pub use splitter::Splitter;
