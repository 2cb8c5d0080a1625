//! Sorting algorithms as steppable units.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use playback::{Experiment, StepContext, Steppable};
use tracing::debug;

use crate::array::{Element, VisualArray};
use crate::error::SortError;

/// Bubble sort, pausable after every comparison.
pub async fn bubble_sort<T: Element>(
    items: &VisualArray<T>,
    ctx: &StepContext,
) -> Result<(), SortError> {
    let len = items.len();
    for i in 0..len {
        items.track_index("end", len - i - 1);
        for j in 0..len - i - 1 {
            items.track_index("j", j);
            items.track_index("j+1", j + 1);
            if items.compare_at_index(ctx, j, j + 1).await? == Ordering::Greater {
                items.swap(ctx, j, j + 1).await?;
            }
            ctx.on_step_completed().await?;
        }
    }
    Ok(())
}

/// Selection sort, pausable after every comparison.
pub async fn selection_sort<T: Element>(
    items: &VisualArray<T>,
    ctx: &StepContext,
) -> Result<(), SortError> {
    let len = items.len();
    for i in 0..len.saturating_sub(1) {
        items.track_index("i", i);
        let mut min = i;
        items.track_index("min", min);
        for j in i + 1..len {
            items.track_index("j", j);
            if items.compare_at_index(ctx, min, j).await? == Ordering::Greater {
                min = j;
                items.track_index("min", min);
            }
            ctx.on_step_completed().await?;
        }
        if min != i {
            items.swap(ctx, i, min).await?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bubble,
    Selection,
}

impl Algorithm {
    pub async fn sort<T: Element>(
        self,
        items: &VisualArray<T>,
        ctx: &StepContext,
    ) -> Result<(), SortError> {
        match self {
            Algorithm::Bubble => bubble_sort(items, ctx).await,
            Algorithm::Selection => selection_sort(items, ctx).await,
        }
    }

    /// One-unit experiment sorting `array`, which is also its drawable.
    pub fn experiment<T: Element>(self, array: Arc<VisualArray<T>>) -> Experiment {
        Experiment::new(self.to_string())
            .with_drawable(array.clone())
            .with_unit(SortUnit::new(self, array))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Bubble => f.write_str("Bubble Sort"),
            Algorithm::Selection => f.write_str("Selection Sort"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" | "bubble-sort" | "bubble_sort" => Ok(Algorithm::Bubble),
            "selection" | "selection-sort" | "selection_sort" => Ok(Algorithm::Selection),
            other => Err(format!("unknown sorting algorithm: {other}")),
        }
    }
}

/// A whole sort as a single unit.
pub struct SortUnit<T> {
    algorithm: Algorithm,
    name: String,
    array: Arc<VisualArray<T>>,
}

impl<T: Element> SortUnit<T> {
    pub fn new(algorithm: Algorithm, array: Arc<VisualArray<T>>) -> Self {
        Self {
            algorithm,
            name: algorithm.to_string(),
            array,
        }
    }
}

#[async_trait]
impl<T: Element> Steppable for SortUnit<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self, ctx: &StepContext) -> anyhow::Result<()> {
        ctx.log(format!("Sorting {} values", self.array.len()));
        self.algorithm.sort(&self.array, ctx).await?;
        debug!(
            algorithm = %self.algorithm,
            comparisons = self.array.comparisons(),
            swaps = self.array.swaps(),
            "sorted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playback::{HeadlessSurface, Speed};

    fn array(values: Vec<i32>) -> VisualArray<i32> {
        VisualArray::new("items", values, Arc::new(HeadlessSurface::new()))
    }

    #[tokio::test]
    async fn test_bubble_sort() {
        let ctx = StepContext::standalone(Speed::MAX);
        let items = array(vec![5, 1, 4, 2, 8]);
        bubble_sort(&items, &ctx).await.unwrap();
        assert_eq!(items.values(), vec![1, 2, 4, 5, 8]);
        assert_eq!(items.comparisons(), 10);
        assert_eq!(items.trackers().get("end"), Some(&0));
    }

    #[tokio::test]
    async fn test_selection_sort() {
        let ctx = StepContext::standalone(Speed::MAX);
        let items = array(vec![64, 25, 12, 22, 11]);
        selection_sort(&items, &ctx).await.unwrap();
        assert_eq!(items.values(), vec![11, 12, 22, 25, 64]);
        assert_eq!(items.comparisons(), 10);
        assert!(items.swaps() <= 4);
    }

    #[tokio::test]
    async fn test_empty_and_single() {
        let ctx = StepContext::standalone(Speed::MAX);
        for algorithm in [Algorithm::Bubble, Algorithm::Selection] {
            let empty = array(vec![]);
            algorithm.sort(&empty, &ctx).await.unwrap();
            assert!(empty.is_empty());

            let single = array(vec![42]);
            algorithm.sort(&single, &ctx).await.unwrap();
            assert_eq!(single.values(), vec![42]);
            assert_eq!(single.comparisons(), 0);
        }
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("bubble-sort".parse::<Algorithm>(), Ok(Algorithm::Bubble));
        assert_eq!("Selection".parse::<Algorithm>(), Ok(Algorithm::Selection));
        assert!("quick".parse::<Algorithm>().is_err());
    }
}
