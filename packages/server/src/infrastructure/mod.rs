//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、通信用の DTO を提供します。

pub mod auth;
pub mod dto;
pub mod history;
pub mod registry;
