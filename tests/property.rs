#[path = "property/propagation_properties.rs"]
mod propagation_properties;
