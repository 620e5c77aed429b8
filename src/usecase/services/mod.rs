pub mod fleet_service;
pub mod import_service;
