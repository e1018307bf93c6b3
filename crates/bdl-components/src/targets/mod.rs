//! Targets: components delivering events to external systems.
//!
//! A target with a `to` attribute replies into the Bridge. It is then
//! reached through a Channel whose Subscription forwards its replies.

mod aws_sns;
mod container;
mod datadog;
mod kafka;

pub use aws_sns::AwsSns;
pub use container::Container;
pub use datadog::Datadog;
pub use kafka::Kafka;
