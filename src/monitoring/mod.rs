//! Run Monitoring Module
//!
//! Records what happened during a run, step by step, for reports.
//!
//! # Components
//!
//! - [`ExecutionTimeline`]: Step start/end/skip events and Gantt chart

pub mod timeline;

pub use timeline::{EventType, ExecutionTimeline, TimelineEvent};
