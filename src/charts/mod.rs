pub mod pie;
pub mod radar;
