//! Temporal analytics: pure aggregation functions over a user's persisted
//! records, plus the [`ReportEngine`] that fetches and composes them.

mod classify;
mod distribution;
mod pad;
mod persona;
mod report;
mod trajectory;
mod trend;

pub use classify::{classify_by_emotion, memory_patterns};
pub use distribution::analyze_distribution;
pub use pad::analyze_pad_trends;
pub use persona::analyze_personas;
pub use report::ReportEngine;
pub use trajectory::analyze_trajectory;
pub use trend::{ols_slope, population_stddev, trend_of};
