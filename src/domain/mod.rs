pub mod entities;
pub mod format;
pub mod forms;
pub mod schema;
