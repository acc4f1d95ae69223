pub mod complaints;
pub mod export;
pub mod health_records;
pub mod records;
pub mod reports;
pub mod settings;
pub mod statistics;
pub mod students;
pub mod teachers;
pub mod videos;
