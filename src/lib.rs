pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod explorer;
pub mod output;
pub mod query;
pub mod record;
pub mod view;

#[cfg(test)]
mod tests;
