mod flow;
mod host;
mod manager;
pub mod types;

pub use flow::SaveFlow;
pub use host::{HostBridge, StdioBridge, Theme};
pub use manager::DevconfigManager;

use std::sync::OnceLock;
use tokio::runtime::Runtime;

pub(crate) fn runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}
