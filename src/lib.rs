pub mod badge;
pub mod cli;
pub mod config;
pub mod error;
pub mod fanout;
pub mod github;
pub mod health;
pub mod models;
pub mod ranking;
pub mod render;
pub mod retry;
pub mod server;
pub mod types;
