//! Definición inmutable de un flujo y su builder.

pub mod builder;
mod definition;

pub use builder::FlowBuilder;
pub use definition::FlowDefinition;
