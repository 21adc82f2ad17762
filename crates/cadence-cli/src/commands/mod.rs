pub mod config;
pub mod data;
pub mod insights;
pub mod record;
pub mod suggest;
