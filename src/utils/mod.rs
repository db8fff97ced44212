pub mod buffer;
pub mod crossing;
pub mod filters;
pub mod peak;
