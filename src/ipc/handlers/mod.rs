pub mod backup;
pub mod core;
pub mod dashboard;
pub mod payments;
pub mod settings;
pub mod teachers;
