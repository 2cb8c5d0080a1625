//! Sorting algorithms written against a tracked array.
//!
//! [`VisualArray`] exposes the array operations an algorithm needs as named
//! methods. Comparisons and swaps animate on a [`playback::Surface`], and
//! the algorithms call [`StepContext::on_step_completed`] after every
//! comparison so a paused session stops mid-sort.
//!
//! [`StepContext::on_step_completed`]: playback::StepContext::on_step_completed

mod algorithms;
mod array;
mod error;

pub use algorithms::{bubble_sort, selection_sort, Algorithm, SortUnit};
pub use array::{Element, VisualArray};
pub use error::{ArrayError, SortError};
