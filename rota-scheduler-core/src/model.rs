pub mod catalog;
pub mod configuration;
pub mod rules;
pub mod tables;
