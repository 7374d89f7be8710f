pub mod binding;
pub mod fields;
pub mod inputs;
