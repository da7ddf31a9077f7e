//! 履歴ストアの実装

pub mod inmemory;

pub use inmemory::InMemoryHistoryStore;
