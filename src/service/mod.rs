pub mod aliases;
pub mod config;
pub mod providers;
pub mod registry;
pub mod settings;
