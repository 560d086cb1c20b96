pub mod client;
pub mod dispatcher;

pub use client::{TelegramClient, TelegramError};
pub use dispatcher::Dispatcher;
