//! Transformers: components modifying events in flight.

mod bumblebee;
mod function;

pub use bumblebee::Bumblebee;
pub use function::Function;
