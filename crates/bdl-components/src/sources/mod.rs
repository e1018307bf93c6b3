//! Sources: components emitting events into the Bridge.
//!
//! Sources are not addressable. Their `to` attribute is mandatory.

mod azure_activity_logs;
mod kafka;
mod ping;

pub use azure_activity_logs::AzureActivityLogs;
pub use kafka::Kafka;
pub use ping::Ping;
