//! Channels: components that buffer and dispatch events.

mod event_broker;
mod pipe;

pub use event_broker::EventBroker;
pub use pipe::Pipe;
