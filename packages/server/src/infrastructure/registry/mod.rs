//! 接続レジストリの実装
//!
//! - `inmemory`: HashMap をロックで保護した実装

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
