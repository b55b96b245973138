pub mod config;
pub mod feddit;
pub mod pipeline;
pub mod sentiment;
pub mod web;
