//! UseCase 層
//!
//! - `session_controller`: レースの状態遷移とイベント送信
//! - `connection_registry`: 接続の登録・ハートビート・切断

mod connection_registry;
mod session_controller;
#[cfg(test)]
pub(crate) mod test_support;

pub use connection_registry::ConnectionRegistry;
pub use session_controller::SessionController;
