//! Sample filtering by value range and category
//!
//! Samples without a category always pass a category filter.

use serde::{Deserialize, Serialize};

use super::types::Sample;

/// Value bounds and category applied to a series before charting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleFilter {
    /// Inclusive lower bound
    #[serde(default)]
    pub min_value: Option<f64>,
    /// Inclusive upper bound
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Required category for categorised samples
    #[serde(default)]
    pub category: Option<String>,
}

impl SampleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: drop samples below `min`
    pub fn min_value(mut self, min: f64) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Builder: drop samples above `max`
    pub fn max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Builder: drop samples tagged with a different category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Whether no bound or category is set
    pub fn is_empty(&self) -> bool {
        self.min_value.is_none() && self.max_value.is_none() && self.active_category().is_none()
    }

    fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn matches(&self, sample: &Sample) -> bool {
        if self.min_value.map_or(false, |min| sample.value < min) {
            return false;
        }
        if self.max_value.map_or(false, |max| sample.value > max) {
            return false;
        }
        match (self.active_category(), sample.category.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }

    /// Keep the matching samples, preserving order
    pub fn apply(&self, samples: Vec<Sample>) -> Vec<Sample> {
        if self.is_empty() {
            return samples;
        }
        samples.into_iter().filter(|s| self.matches(s)).collect()
    }
}
