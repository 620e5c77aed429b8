pub mod blocking;
pub mod viewport;
