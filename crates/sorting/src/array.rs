//! Array with named, animated operations.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use playback::{Drawable, Effect, StepContext, Surface};
use tracing::trace;

use crate::error::ArrayError;

/// Base duration of a comparison highlight at normal speed.
const HIGHLIGHT: Duration = Duration::from_millis(1000);
/// Base duration of a swap at normal speed.
const SWAP: Duration = Duration::from_millis(1000);
/// Width of one cell in layout units.
const CELL_WIDTH: f64 = 50.0;

/// Values a [`VisualArray`] can hold.
pub trait Element: Ord + Clone + fmt::Display + Send + Sync + 'static {}

impl<T> Element for T where T: Ord + Clone + fmt::Display + Send + Sync + 'static {}

struct Cells<T> {
    values: Vec<T>,
    /// Visual element shown at each position; elements travel with their
    /// values through swaps.
    elements: Vec<usize>,
    trackers: BTreeMap<String, usize>,
    comparisons: u64,
    swaps: u64,
}

impl<T: Clone> Cells<T> {
    fn new(values: &[T]) -> Self {
        Self {
            values: values.to_vec(),
            elements: (0..values.len()).collect(),
            trackers: BTreeMap::new(),
            comparisons: 0,
            swaps: 0,
        }
    }

    fn check(&self, index: usize) -> Result<(), ArrayError> {
        if index < self.values.len() {
            Ok(())
        } else {
            Err(ArrayError::OutOfBounds {
                index,
                len: self.values.len(),
            })
        }
    }
}

fn cell_x(index: usize) -> f64 {
    index as f64 * CELL_WIDTH
}

/// An array drawn on a [`Surface`], one visual per element.
///
/// Plain reads and writes (`get`, `set`, `len`) are immediate. `swap` and
/// `compare_at_index` animate and take time proportional to the session
/// speed. Index trackers are named markers (`i`, `j`, `min`) shown under
/// the cells.
pub struct VisualArray<T> {
    name: String,
    original: Vec<T>,
    cells: Mutex<Cells<T>>,
    surface: Arc<dyn Surface>,
}

impl<T: Element> VisualArray<T> {
    pub fn new(name: impl Into<String>, values: Vec<T>, surface: Arc<dyn Surface>) -> Self {
        let array = Self {
            name: name.into(),
            cells: Mutex::new(Cells::new(&values)),
            original: values,
            surface,
        };
        array.draw();
        array
    }

    fn element_id(&self, element: usize) -> String {
        format!("{}[{}]", self.name, element)
    }

    fn draw(&self) {
        let cells = self.cells.lock();
        for (element, value) in cells.elements.iter().zip(&cells.values) {
            self.surface
                .add_visual(&self.element_id(*element), &value.to_string());
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.cells.lock().values.get(index).cloned()
    }

    /// Overwrite the value at `index` and relabel its element.
    pub fn set(&self, index: usize, value: T) -> Result<(), ArrayError> {
        let mut cells = self.cells.lock();
        cells.check(index)?;
        let label = value.to_string();
        cells.values[index] = value;
        let id = self.element_id(cells.elements[index]);
        drop(cells);
        self.surface.add_visual(&id, &label);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<T> {
        self.cells.lock().values.clone()
    }

    /// Element id displayed at `index`.
    pub fn element_at(&self, index: usize) -> Option<usize> {
        self.cells.lock().elements.get(index).copied()
    }

    /// Highlight both cells, then compare `values[i]` with `values[j]`.
    pub async fn compare_at_index(
        &self,
        ctx: &StepContext,
        i: usize,
        j: usize,
    ) -> Result<Ordering, ArrayError> {
        let (ordering, a, b) = {
            let mut cells = self.cells.lock();
            cells.check(i)?;
            cells.check(j)?;
            cells.comparisons += 1;
            (
                cells.values[i].cmp(&cells.values[j]),
                self.element_id(cells.elements[i]),
                self.element_id(cells.elements[j]),
            )
        };

        let duration = ctx.scale(HIGHLIGHT);
        tokio::join!(
            self.surface.run_transition(&a, Effect::Highlight, duration),
            self.surface.run_transition(&b, Effect::Highlight, duration),
        );
        trace!(array = %self.name, i, j, ?ordering, "compare");
        Ok(ordering)
    }

    /// Exchange the values at `i` and `j`, moving both elements.
    pub async fn swap(&self, ctx: &StepContext, i: usize, j: usize) -> Result<(), ArrayError> {
        let (to_j, to_i) = {
            let mut cells = self.cells.lock();
            cells.check(i)?;
            cells.check(j)?;
            cells.values.swap(i, j);
            cells.elements.swap(i, j);
            cells.swaps += 1;
            (
                self.element_id(cells.elements[j]),
                self.element_id(cells.elements[i]),
            )
        };

        let duration = ctx.scale(SWAP);
        tokio::join!(
            self.surface.run_transition(
                &to_j,
                Effect::MoveTo { x: cell_x(j), y: 0.0 },
                duration
            ),
            self.surface.run_transition(
                &to_i,
                Effect::MoveTo { x: cell_x(i), y: 0.0 },
                duration
            ),
        );
        trace!(array = %self.name, i, j, "swap");
        Ok(())
    }

    /// Point the tracker `name` at `index`, creating it if needed.
    pub fn track_index(&self, name: &str, index: usize) {
        self.cells.lock().trackers.insert(name.to_owned(), index);
    }

    pub fn trackers(&self) -> BTreeMap<String, usize> {
        self.cells.lock().trackers.clone()
    }

    pub fn comparisons(&self) -> u64 {
        self.cells.lock().comparisons
    }

    pub fn swaps(&self) -> u64 {
        self.cells.lock().swaps
    }

    /// Put the original values back and redraw.
    pub fn restore(&self) {
        let mut cells = self.cells.lock();
        for element in 0..cells.elements.len() {
            self.surface.remove_visual(&self.element_id(element));
        }
        *cells = Cells::new(&self.original);
        drop(cells);
        self.draw();
    }
}

#[async_trait]
impl<T: Element> Drawable for VisualArray<T> {
    async fn reset(&self) {
        self.restore();
    }

    async fn stats(&self) -> Option<String> {
        let cells = self.cells.lock();
        Some(format!(
            "comparisons: {}, swaps: {}",
            cells.comparisons, cells.swaps
        ))
    }
}

impl<T: fmt::Debug> fmt::Debug for VisualArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualArray")
            .field("name", &self.name)
            .field("values", &self.cells.lock().values)
            .finish()
    }
}
