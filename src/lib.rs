pub mod api;
pub mod config;
pub mod download;
pub mod extract;
pub mod fetch;
pub mod humanize;
pub mod observability;
pub mod platform;
pub mod profile;
