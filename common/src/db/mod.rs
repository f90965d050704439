pub mod core;
pub mod indices;
pub mod layout;
