pub mod delete;
pub mod health;
pub mod optimize;
pub mod thumbnail;
