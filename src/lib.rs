pub mod config;
pub mod discord;
pub mod logging;
pub mod platform;
pub mod presence;
pub mod startup;

#[cfg(test)]
mod test_utils;
