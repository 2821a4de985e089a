pub mod chat;
pub mod entries;
pub mod health;
