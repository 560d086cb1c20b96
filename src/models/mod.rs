pub mod position;
pub mod wallet;

pub use position::{NewTokenPosition, TokenPosition};
pub use wallet::{NewWalletEntry, WalletEntry};
