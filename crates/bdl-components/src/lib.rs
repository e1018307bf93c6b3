// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Component catalogue of the Bridge Description Language.
//!
//! Every supported (category, type) pair has an implementation here, built
//! on the Kubernetes helpers of [`k8s`]. [`registry`] returns them all.
//!
//! | category | types |
//! |---|---|
//! | channel | `event_broker`, `pipe` |
//! | router | `content_based`, `splitter` |
//! | transformer | `bumblebee`, `function` |
//! | source | `kafka`, `azure_activity_logs`, `ping` |
//! | target | `aws_sns`, `kafka`, `datadog`, `container` |

/// Implements `ComponentImpl` for a type, exposing the listed capabilities.
macro_rules! capabilities {
    ($ty:ty: $($cap:ident),+ $(,)?) => {
        impl bdl_core::ComponentImpl for $ty {
            $(capabilities!(@accessor $cap);)+
        }
    };
    (@accessor decodable) => {
        fn decodable(&self) -> Option<&dyn bdl_core::Decodable> {
            Some(self)
        }
    };
    (@accessor translatable) => {
        fn translatable(&self) -> Option<&dyn bdl_core::Translatable> {
            Some(self)
        }
    };
    (@accessor addressable) => {
        fn addressable(&self) -> Option<&dyn bdl_core::Addressable> {
            Some(self)
        }
    };
}

pub mod channels;
pub mod k8s;
pub mod routers;
pub mod secrets;
pub mod sources;
pub mod targets;
pub mod transformers;

use bdl_ast::ComponentCategory;
use bdl_core::Registry;
use tracing::debug;

/// A registry with every component of the catalogue.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(ComponentCategory::Channel, "event_broker", channels::EventBroker)
        .register(ComponentCategory::Channel, "pipe", channels::Pipe)
        .register(ComponentCategory::Router, "content_based", routers::ContentBased)
        .register(ComponentCategory::Router, "splitter", routers::Splitter)
        .register(ComponentCategory::Transformer, "bumblebee", transformers::Bumblebee)
        .register(ComponentCategory::Transformer, "function", transformers::Function)
        .register(ComponentCategory::Source, "kafka", sources::Kafka)
        .register(
            ComponentCategory::Source,
            "azure_activity_logs",
            sources::AzureActivityLogs,
        )
        .register(ComponentCategory::Source, "ping", sources::Ping)
        .register(ComponentCategory::Target, "aws_sns", targets::AwsSns)
        .register(ComponentCategory::Target, "kafka", targets::Kafka)
        .register(ComponentCategory::Target, "datadog", targets::Datadog)
        .register(ComponentCategory::Target, "container", targets::Container);
    debug!(components = registry.len(), "component registry initialised");
    registry
}
