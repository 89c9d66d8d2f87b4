pub mod api;
pub mod config;
pub mod handlers;
pub mod prometheus;
pub mod router;
pub mod server;

#[cfg(test)]
mod test_utils;
