pub mod export;
pub mod import;
pub mod simulated;
pub mod sqlite;
