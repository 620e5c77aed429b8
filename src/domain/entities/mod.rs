pub mod edit;
pub mod fleet;
pub mod measurement;
pub mod record;
pub mod table;
