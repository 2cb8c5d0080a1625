//! Rendering surface.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

/// Shortest transition worth waiting for: one frame at 60 fps.
pub const FRAME: Duration = Duration::from_micros(16_667);

/// Target of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Appear,
    Disappear,
    Highlight,
    /// Move to a layout position.
    MoveTo { x: f64, y: f64 },
    /// Move onto another visual.
    MoveOnto(String),
}

/// Where visuals live. Transitions resolve when they finish so steps can be
/// sequenced after them.
#[async_trait]
pub trait Surface: Send + Sync {
    fn add_visual(&self, id: &str, label: &str);

    fn remove_visual(&self, id: &str);

    async fn run_transition(&self, id: &str, effect: Effect, duration: Duration);
}

/// A surface with no display.
///
/// Transitions sleep for their duration. Anything shorter than a frame
/// only yields.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    visuals: Mutex<BTreeMap<String, String>>,
    transitions: AtomicU64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_visual(&self, id: &str) -> bool {
        self.visuals.lock().contains_key(id)
    }

    pub fn label(&self, id: &str) -> Option<String> {
        self.visuals.lock().get(id).cloned()
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.lock().len()
    }

    /// Transitions run so far.
    pub fn transition_count(&self) -> u64 {
        self.transitions.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Surface for HeadlessSurface {
    fn add_visual(&self, id: &str, label: &str) {
        trace!(id, label, "add visual");
        self.visuals.lock().insert(id.to_owned(), label.to_owned());
    }

    fn remove_visual(&self, id: &str) {
        trace!(id, "remove visual");
        self.visuals.lock().remove(id);
    }

    async fn run_transition(&self, id: &str, effect: Effect, duration: Duration) {
        trace!(id, ?effect, ?duration, "transition");
        self.transitions.fetch_add(1, Ordering::Relaxed);
        if duration >= FRAME {
            tokio::time::sleep(duration).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_transition_takes_its_duration() {
        let surface = HeadlessSurface::new();
        surface.add_visual("S1", "S1");

        let start = tokio::time::Instant::now();
        surface
            .run_transition("S1", Effect::Highlight, Duration::from_millis(500))
            .await;
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(surface.transition_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_runs_concurrently() {
        let surface = HeadlessSurface::new();
        let start = tokio::time::Instant::now();
        tokio::join!(
            surface.run_transition("a", Effect::Highlight, Duration::from_millis(300)),
            surface.run_transition("b", Effect::Highlight, Duration::from_millis(300)),
        );
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(600), "ran sequentially: {elapsed:?}");
        assert_eq!(surface.transition_count(), 2);
    }

    #[test]
    fn test_visuals() {
        let surface = HeadlessSurface::new();
        surface.add_visual("S1", "S1");
        surface.add_visual("k", "abc");
        assert_eq!(surface.label("k").as_deref(), Some("abc"));
        surface.remove_visual("k");
        assert!(!surface.has_visual("k"));
        assert_eq!(surface.visual_count(), 1);
    }
}
