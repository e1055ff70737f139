//! Storefront selection state machine
//!
//! Wraps an [`AvailabilityIndex`] and tracks the shopper's partial picks.
//! After every pick the controller clears any sibling dimension whose fixed
//! value no longer has a matching in-stock variant, so the selection never
//! outlives its last valid combination.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::availability::{AvailabilityIndex, FallbackPolicy};
use crate::domain::variants::PersistedVariant;

/// The fixed dimensions of one shopper viewing one product. An unfixed
/// dimension is simply absent; the whole selection resets on product change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(BTreeMap<String, i64>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed(&self, dimension: &str) -> Option<i64> {
        self.0.get(dimension).copied()
    }

    pub fn set(&mut self, dimension: &str, value_id: i64) {
        self.0.insert(dimension.to_string(), value_id);
    }

    pub fn clear(&mut self, dimension: &str) {
        self.0.remove(dimension);
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(d, &v)| (d.as_str(), v))
    }
}

#[derive(Clone, Debug)]
pub struct SelectionController {
    index: AvailabilityIndex,
    policy: FallbackPolicy,
    selection: Selection,
}

impl SelectionController {
    pub fn new(index: AvailabilityIndex) -> Self {
        Self::with_policy(index, FallbackPolicy::default())
    }

    pub fn with_policy(index: AvailabilityIndex, policy: FallbackPolicy) -> Self {
        Self { index, policy, selection: Selection::new() }
    }

    pub fn index(&self) -> &AvailabilityIndex {
        &self.index
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Fixes `value_id` on `dimension`, or toggles it off when already fixed.
    /// Then walks every other fixed dimension in declaration order and clears
    /// each whose value is no longer reachable under the evolving selection.
    /// Callers only offer reachable values; a fixed value still unreachable
    /// after the pass is a bug in this rule and trips a debug assertion.
    pub fn pick(&mut self, dimension: &str, value_id: i64) {
        if self.selection.fixed(dimension) == Some(value_id) {
            self.selection.clear(dimension);
        } else {
            self.selection.set(dimension, value_id);
        }
        self.clear_unreachable(Some(dimension));
        self.assert_reachable();
    }

    /// Clears every pick; used when the shopper navigates to another product.
    pub fn reset(&mut self) {
        self.selection.clear_all();
    }

    /// Swaps in a freshly built index after the persisted variant list
    /// changed. Picks still reachable under the new data survive, the rest
    /// are cleared; nothing derived is cached, so no stale results linger.
    pub fn rebuild(&mut self, index: AvailabilityIndex) {
        self.index = index;
        self.clear_unreachable(None);
        self.assert_reachable();
    }

    /// The single variant the current selection implies, if any.
    pub fn matched(&self) -> Option<&PersistedVariant> {
        self.index.match_variant(&self.selection, self.policy)
    }

    /// Values of `dimension` the UI should leave enabled right now.
    pub fn reachable(&self, dimension: &str) -> BTreeSet<i64> {
        self.index.reachable_values(dimension, &self.selection)
    }

    /// Every offered dimension is either fixed or has only one possible
    /// value. A dimension absent from all variants is never required.
    pub fn is_fully_selected(&self) -> bool {
        self.index.dimensions().iter().all(|d| {
            self.selection.fixed(d).is_some() || self.index.offered_values(d).len() <= 1
        })
    }

    fn clear_unreachable(&mut self, except: Option<&str>) {
        // the selection may hold picks on dimensions the current index no
        // longer offers (vanished after a rebuild); those must be cleared too
        let mut dimensions = self.index.dimensions().to_vec();
        for (dim, _) in self.selection.iter() {
            if !dimensions.iter().any(|d| d == dim) {
                dimensions.push(dim.to_string());
            }
        }
        for dimension in dimensions {
            if Some(dimension.as_str()) == except {
                continue;
            }
            let Some(value) = self.selection.fixed(&dimension) else { continue };
            if !self.index.reachable_values(&dimension, &self.selection).contains(&value) {
                tracing::debug!(%dimension, value, "clearing incompatible pick");
                self.selection.clear(&dimension);
            }
        }
    }

    /// Checks the invariant that every fixed value is still reachable. A
    /// violation means the clearing rule itself is broken; `pick` and
    /// `rebuild` treat it as fatal in debug builds.
    pub fn validate(&self) -> crate::Result<()> {
        for (dimension, value) in self.selection.iter() {
            if !self.index.reachable_values(dimension, &self.selection).contains(&value) {
                return Err(crate::VariantError::UnreachableSelection {
                    dimension: dimension.to_string(),
                    value_id: value,
                });
            }
        }
        Ok(())
    }

    fn assert_reachable(&self) {
        if let Err(err) = self.validate() {
            debug_assert!(false, "{err}");
            tracing::error!(%err, "selection invariant violated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn variant(color: i64, size: i64, stock: u32) -> PersistedVariant {
        let axes: BTreeMap<String, i64> =
            [("color".to_string(), color), ("size".to_string(), size)].into();
        PersistedVariant::new(Uuid::new_v4(), axes, stock, Money::default())
    }

    fn dims() -> Vec<String> {
        vec!["color".into(), "size".into()]
    }

    // red=1 blue=2, S=10 M=11
    fn red_s_blue_m() -> AvailabilityIndex {
        AvailabilityIndex::build(&dims(), vec![variant(1, 10, 4), variant(2, 11, 2)])
    }

    #[test]
    fn test_incompatible_sibling_is_cleared() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        ctl.pick("size", 11);
        assert_eq!(ctl.selection().fixed("color"), None);
        assert_eq!(ctl.selection().fixed("size"), Some(11));
        assert_eq!(ctl.matched().unwrap().value_on("color"), Some(2)); // {blue,M}

        // red has no M left, so the size pick is cleared
        ctl.pick("color", 1);
        assert_eq!(ctl.selection().fixed("color"), Some(1));
        assert_eq!(ctl.selection().fixed("size"), None);
        // fallback resolves to the only red variant
        assert_eq!(ctl.matched().unwrap().value_on("size"), Some(10)); // {red,S}
    }

    #[test]
    fn test_pick_toggles_off() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        ctl.pick("color", 1);
        assert_eq!(ctl.selection().len(), 1);
        ctl.pick("color", 1);
        assert!(ctl.selection().is_empty());
    }

    #[test]
    fn test_fallback_match_with_empty_selection() {
        let ctl = SelectionController::new(red_s_blue_m());
        assert!(ctl.matched().is_some());
        let strict = SelectionController::with_policy(red_s_blue_m(), FallbackPolicy::RequireSelection);
        assert!(strict.matched().is_none());
    }

    #[test]
    fn test_is_fully_selected() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        assert!(!ctl.is_fully_selected());
        ctl.pick("color", 2); // clears nothing, size still open
        assert!(!ctl.is_fully_selected());
        ctl.pick("size", 11);
        assert!(ctl.is_fully_selected());
    }

    #[test]
    fn test_single_valued_dimension_not_required() {
        let index =
            AvailabilityIndex::build(&dims(), vec![variant(1, 10, 1), variant(2, 10, 3)]);
        let mut ctl = SelectionController::new(index);
        ctl.pick("color", 2);
        // size only ever has one value, no explicit pick needed
        assert!(ctl.is_fully_selected());
    }

    #[test]
    fn test_validate_after_picks() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        ctl.pick("size", 11);
        ctl.pick("color", 1);
        assert!(ctl.validate().is_ok());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        ctl.pick("color", 1);
        ctl.reset();
        assert!(ctl.selection().is_empty());
    }

    #[test]
    fn test_rebuild_drops_stale_picks() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        ctl.pick("color", 2);
        // blue sells out
        ctl.rebuild(AvailabilityIndex::build(&dims(), vec![variant(1, 10, 4), variant(2, 11, 0)]));
        assert_eq!(ctl.selection().fixed("color"), None);
        assert_eq!(ctl.matched().unwrap().value_on("color"), Some(1));
    }

    #[test]
    fn test_rebuild_clears_pick_on_vanished_dimension() {
        let mut ctl = SelectionController::new(red_s_blue_m());
        ctl.pick("size", 11);
        // restock leaves only a one-axis variant: size is gone entirely
        let axes: BTreeMap<String, i64> = [("color".to_string(), 1)].into();
        let only_color = PersistedVariant::new(Uuid::new_v4(), axes, 3, Money::default());
        ctl.rebuild(AvailabilityIndex::build(&dims(), vec![only_color]));
        assert!(ctl.selection().is_empty());
        assert!(ctl.validate().is_ok());
        assert_eq!(ctl.matched().unwrap().value_on("color"), Some(1));
    }

    #[test]
    fn test_reachable_reported_per_dimension() {
        let index = AvailabilityIndex::build(
            &dims(),
            vec![variant(1, 10, 4), variant(1, 11, 0), variant(2, 11, 2)],
        );
        let mut ctl = SelectionController::new(index);
        ctl.pick("color", 1);
        assert_eq!(ctl.reachable("size"), BTreeSet::from([10]));
        assert_eq!(ctl.reachable("color"), BTreeSet::from([1, 2]));
    }
}
