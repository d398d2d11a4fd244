//! Output
//!
//! Read-only summaries and the final run report.

pub mod summary;

pub use summary::{
    agent_summaries, build_stats, relationship_summaries, write_report, RunReport,
};
