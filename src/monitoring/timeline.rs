//! Execution Timeline
//!
//! Tracks when each step of a run started and finished, and which steps
//! were skipped by their condition. Used for run reports and the textual
//! Gantt chart printed by the CLI.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Type of timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Step task invoked
    Started,
    /// Step task returned a result
    Completed,
    /// Step task returned an error
    Failed,
    /// Step condition was false, task not invoked
    Skipped,
}

/// A single event in the execution timeline.
#[derive(Debug, Clone)]
pub struct TimelineEvent {
    pub step_id: String,
    pub event_type: EventType,
    pub timestamp: Instant,
}

/// Ordered record of step events for one run.
#[derive(Debug, Clone)]
pub struct ExecutionTimeline {
    events: Vec<TimelineEvent>,
    start_time: Instant,
}

impl ExecutionTimeline {
    /// Creates a new timeline starting now.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Records an event for a step.
    pub fn add_event(&mut self, step_id: impl Into<String>, event_type: EventType) {
        self.events.push(TimelineEvent {
            step_id: step_id.into(),
            event_type,
            timestamp: Instant::now(),
        });
    }

    /// Returns all recorded events.
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Returns the total elapsed time since timeline creation.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Steps skipped by their condition, in visit order.
    pub fn skipped_steps(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.event_type == EventType::Skipped)
            .map(|e| e.step_id.as_str())
            .collect()
    }

    /// Generates an ASCII Gantt chart of the steps that ran.
    ///
    /// Offsets are measured in microseconds so that sub-millisecond steps
    /// still get a row.
    pub fn gantt_chart(&self) -> String {
        let mut output = String::from("\nExecution Timeline:\n\n");

        if self.events.is_empty() {
            return output;
        }

        let total_time = self.last_event_micros();

        // Scale to 50 characters width
        let scale = 50.0 / total_time.max(1) as f64;

        let mut spans: Vec<(String, u128, u128)> = Vec::new();
        let mut open: HashMap<&str, u128> = HashMap::new();

        for event in &self.events {
            let elapsed = self.offset_micros(event);
            match event.event_type {
                EventType::Started => {
                    open.insert(event.step_id.as_str(), elapsed);
                }
                EventType::Completed | EventType::Failed => {
                    if let Some(start) = open.remove(event.step_id.as_str()) {
                        spans.push((event.step_id.clone(), start, elapsed));
                    }
                }
                EventType::Skipped => {}
            }
        }

        for (step_id, start, end) in spans {
            let start_pos = ((start as f64 * scale) as usize).min(49);
            let width = ((end - start) as f64 * scale).max(1.0) as usize;

            let mut bar = " ".repeat(start_pos);
            bar.push_str(&"#".repeat(width));

            output.push_str(&format!(
                "{:12} |{}| ({} ms)\n",
                truncate(&step_id, 12),
                bar,
                format_millis(end - start)
            ));
        }

        for step_id in self.skipped_steps() {
            output.push_str(&format!("{:12} (skipped)\n", truncate(step_id, 12)));
        }

        output.push_str(&format!("\nTotal: {} ms\n", format_millis(total_time)));
        output
    }

    /// Returns step durations in milliseconds.
    ///
    /// A revisited step keeps the duration of its last visit.
    pub fn durations(&self) -> HashMap<String, u128> {
        let mut starts: HashMap<&str, u128> = HashMap::new();
        let mut durations: HashMap<String, u128> = HashMap::new();

        for event in &self.events {
            let elapsed = self.offset_millis(event);

            match event.event_type {
                EventType::Started => {
                    starts.insert(event.step_id.as_str(), elapsed);
                }
                EventType::Completed | EventType::Failed => {
                    if let Some(start) = starts.get(event.step_id.as_str()) {
                        durations.insert(event.step_id.clone(), elapsed - start);
                    }
                }
                EventType::Skipped => {}
            }
        }

        durations
    }

    fn offset_millis(&self, event: &TimelineEvent) -> u128 {
        event.timestamp.duration_since(self.start_time).as_millis()
    }

    fn offset_micros(&self, event: &TimelineEvent) -> u128 {
        event.timestamp.duration_since(self.start_time).as_micros()
    }

    fn last_event_micros(&self) -> u128 {
        self.events
            .last()
            .map(|e| self.offset_micros(e))
            .unwrap_or(0)
    }
}

impl Default for ExecutionTimeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a microsecond count as milliseconds with three decimals.
fn format_millis(micros: u128) -> String {
    format!("{}.{:03}", micros / 1000, micros % 1000)
}

/// Pads or truncates a string to a fixed width.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timeline_creation() {
        let timeline = ExecutionTimeline::new();
        assert!(timeline.events().is_empty());
    }

    #[test]
    fn test_get_durations() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("step1", EventType::Started);
        thread::sleep(Duration::from_millis(50));
        timeline.add_event("step1", EventType::Completed);

        let durations = timeline.durations();
        assert!(*durations.get("step1").unwrap() >= 50);
    }

    #[test]
    fn test_failed_step_has_duration() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("step1", EventType::Started);
        timeline.add_event("step1", EventType::Failed);

        assert!(timeline.durations().contains_key("step1"));
        assert_eq!(timeline.events()[1].event_type, EventType::Failed);
    }

    #[test]
    fn test_skipped_steps() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("a", EventType::Started);
        timeline.add_event("a", EventType::Completed);
        timeline.add_event("b", EventType::Skipped);
        timeline.add_event("c", EventType::Skipped);

        assert_eq!(timeline.skipped_steps(), vec!["b", "c"]);
        assert!(!timeline.durations().contains_key("b"));
    }

    #[test]
    fn test_durations_only_started() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("step1", EventType::Started);
        assert!(timeline.durations().is_empty());
    }

    #[test]
    fn test_gantt_chart_generation() {
        let mut timeline = ExecutionTimeline::new();

        timeline.add_event("step1", EventType::Started);
        thread::sleep(Duration::from_millis(20));
        timeline.add_event("step1", EventType::Completed);
        timeline.add_event("step2", EventType::Skipped);
        timeline.add_event("step3", EventType::Started);
        thread::sleep(Duration::from_millis(20));
        timeline.add_event("step3", EventType::Completed);

        let chart = timeline.gantt_chart();
        assert!(chart.contains("step1"));
        assert!(chart.contains("step2        (skipped)"));
        assert!(chart.contains("step3"));
        assert!(chart.contains("Total:"));
    }

    #[test]
    fn test_gantt_chart_empty() {
        let chart = ExecutionTimeline::default().gantt_chart();
        assert!(chart.contains("Timeline"));
        assert!(!chart.contains("Total:"));
    }

    #[test]
    fn test_gantt_chart_without_delays() {
        let mut timeline = ExecutionTimeline::new();
        timeline.add_event("fast", EventType::Started);
        timeline.add_event("fast", EventType::Completed);
        timeline.add_event("gated", EventType::Skipped);

        let chart = timeline.gantt_chart();
        assert!(chart.contains("fast"));
        assert!(chart.contains("#"));
        assert!(chart.contains("gated        (skipped)"));
        assert!(chart.contains("Total:"));
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "0.000");
        assert_eq!(format_millis(1_234), "1.234");
        assert_eq!(format_millis(20_050), "20.050");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc  ");
        assert_eq!(truncate("a_very_long_step_id", 8), "a_ver...");
    }
}
