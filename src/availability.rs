//! Derived availability view over the persisted variants of one product
//!
//! Rebuilt wholesale whenever the variant list changes; queries are pure with
//! respect to the built data and never return an out-of-stock variant.

use std::collections::{BTreeSet, HashMap};

use crate::domain::variants::PersistedVariant;
use crate::selection::Selection;

/// How `match_variant` resolves an empty selection. The storefront default is
/// to always present something purchasable if anything is in stock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    #[default]
    FirstInStock,
    LowestPrice,
    RequireSelection,
}

#[derive(Clone, Debug, Default)]
pub struct AvailabilityIndex {
    variants: Vec<PersistedVariant>,
    in_stock: Vec<usize>,
    by_value: HashMap<String, HashMap<i64, Vec<usize>>>,
    dimensions: Vec<String>,
}

impl AvailabilityIndex {
    /// O(n) build. `declared_dimensions` gives the product's dimension order;
    /// a dimension absent from every variant is not offered.
    pub fn build(declared_dimensions: &[String], variants: Vec<PersistedVariant>) -> Self {
        let mut by_value: HashMap<String, HashMap<i64, Vec<usize>>> = HashMap::new();
        let mut in_stock = Vec::new();
        for (index, variant) in variants.iter().enumerate() {
            if variant.is_in_stock() {
                in_stock.push(index);
            }
            for (dim, &value) in &variant.axes {
                by_value
                    .entry(dim.clone())
                    .or_default()
                    .entry(value)
                    .or_default()
                    .push(index);
            }
        }
        let dimensions = declared_dimensions
            .iter()
            .filter(|d| by_value.contains_key(*d))
            .cloned()
            .collect();
        tracing::debug!(
            variants = variants.len(),
            in_stock = in_stock.len(),
            "availability index rebuilt"
        );
        Self { variants, in_stock, by_value, dimensions }
    }

    /// Offered dimensions in declaration order.
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn variants(&self) -> &[PersistedVariant] {
        &self.variants
    }

    pub fn has_stock(&self) -> bool {
        !self.in_stock.is_empty()
    }

    /// Distinct value ids on `dimension` across the raw list, including
    /// out-of-stock variants (disabled options are still rendered).
    pub fn offered_values(&self, dimension: &str) -> BTreeSet<i64> {
        self.by_value
            .get(dimension)
            .map(|postings| postings.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The exact set of values on `dimension` backed by at least one in-stock
    /// variant consistent with every fixed dimension of `partial` other than
    /// `dimension` itself. An absent axis counts as wildcard.
    pub fn reachable_values(&self, dimension: &str, partial: &Selection) -> BTreeSet<i64> {
        let Some(postings) = self.by_value.get(dimension) else {
            return BTreeSet::new();
        };
        postings
            .iter()
            .filter(|(_, indices)| {
                indices.iter().any(|&i| {
                    let v = &self.variants[i];
                    v.is_in_stock() && v.matches(partial, Some(dimension))
                })
            })
            .map(|(&value, _)| value)
            .collect()
    }

    /// The first in-stock variant consistent with every fixed dimension of
    /// `selection`; for a full selection the no-duplicate-pair invariant makes
    /// it unique. An empty selection resolves via `fallback`.
    pub fn match_variant(
        &self,
        selection: &Selection,
        fallback: FallbackPolicy,
    ) -> Option<&PersistedVariant> {
        if selection.is_empty() {
            return match fallback {
                FallbackPolicy::FirstInStock => {
                    self.in_stock.first().map(|&i| &self.variants[i])
                }
                FallbackPolicy::LowestPrice => self
                    .in_stock
                    .iter()
                    .map(|&i| &self.variants[i])
                    .min_by_key(|v| v.price.amount()),
                FallbackPolicy::RequireSelection => None,
            };
        }
        self.in_stock
            .iter()
            .map(|&i| &self.variants[i])
            .find(|v| v.matches(selection, None))
    }
}
