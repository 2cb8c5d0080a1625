//! A named batch of units.

use std::sync::Arc;

use async_trait::async_trait;

use crate::unit::Steppable;

/// State shown next to a running experiment.
///
/// `reset` restores the initial picture before a replay; `stats` is the text
/// of the stats panel, refreshed after every unit.
#[async_trait]
pub trait Drawable: Send + Sync {
    async fn reset(&self);

    async fn stats(&self) -> Option<String> {
        None
    }
}

/// The ordered units of one run, plus what they draw on.
pub struct Experiment {
    name: String,
    pub(crate) units: Vec<Box<dyn Steppable>>,
    pub(crate) drawable: Option<Arc<dyn Drawable>>,
}

impl Experiment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
            drawable: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Steppable + 'static) -> Self {
        self.push(unit);
        self
    }

    pub fn with_drawable(mut self, drawable: Arc<dyn Drawable>) -> Self {
        self.drawable = Some(drawable);
        self
    }

    pub fn push(&mut self, unit: impl Steppable + 'static) {
        self.units.push(Box::new(unit));
    }

    pub fn push_boxed(&mut self, unit: Box<dyn Steppable>) {
        self.units.push(unit);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.name())
    }
}

impl std::fmt::Debug for Experiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Experiment")
            .field("name", &self.name)
            .field("units", &self.unit_names().collect::<Vec<_>>())
            .field("drawable", &self.drawable.is_some())
            .finish()
    }
}
