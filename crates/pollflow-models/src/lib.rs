pub mod chat;
pub mod poll;

pub use chat::{ChatMessage, Sender};
pub use poll::{Poll, PollAnswer, PollOption};
