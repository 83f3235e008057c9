pub mod config;
pub mod intent;
pub mod record;
pub mod response;
