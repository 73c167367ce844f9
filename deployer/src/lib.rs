pub mod chain;
pub mod config;
pub mod confirm;
pub mod deployer;
pub mod error;
pub mod pipeline;
pub mod reconciler;
pub mod sequences;
pub mod types;
#[cfg(test)]
pub mod tests;
