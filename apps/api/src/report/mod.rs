// Interview report: Helvetica metric tables, word-wrap, and PDF serialization.
// Pure CPU work; callers run it inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod pdf;

// Re-export the public API consumed by the interview controller.
pub use font_metrics::{default_page_config, PageConfig};
pub use pdf::{build_report, ReportEntry};
