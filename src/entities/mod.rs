pub mod plugins;
pub mod sites;
pub mod user_groups;
