pub mod chat;
pub mod polls;
