pub mod cbt;
pub mod chat;
pub mod gateway;
pub mod sentiment;
pub mod suggestions;
