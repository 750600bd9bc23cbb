pub mod analyze;
pub mod history;
pub mod stats;
pub mod stream;

pub use analyze::analyze;
pub use history::{get_history, get_manual_history};
pub use stats::{get_system_stats, health_check};
pub use stream::stream_verdicts;
