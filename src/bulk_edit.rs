//! Bulk price/stock editing over generated draft variants
//!
//! An operator selects a subset of rows, opens a draft, applies a single
//! price and/or quantity to every selected row, optionally corrects single
//! rows, then commits. Until `commit` the committed rows are untouched;
//! `cancel` throws the draft away.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::value_objects::{AttributeSet, Money};
use crate::domain::variants::{DraftVariant, VariantRecord};
use crate::{Result, VariantError};

#[derive(Clone, Debug)]
pub enum DraftField {
    Price(Money),
    Quantity(u32),
}

#[derive(Clone, Debug, Default)]
pub struct BulkEditSession {
    committed: Vec<DraftVariant>,
    draft: Option<Vec<DraftVariant>>,
    selected: BTreeSet<usize>,
}

impl BulkEditSession {
    pub fn new(variants: Vec<DraftVariant>) -> Self {
        Self { committed: variants, draft: None, selected: BTreeSet::new() }
    }

    pub fn committed(&self) -> &[DraftVariant] { &self.committed }
    pub fn draft(&self) -> Option<&[DraftVariant]> { self.draft.as_deref() }
    pub fn selected(&self) -> &BTreeSet<usize> { &self.selected }
    pub fn is_selected(&self, index: usize) -> bool { self.selected.contains(&index) }

    /// The rows the UI renders: the draft while one is open, otherwise the
    /// committed rows.
    pub fn rows(&self) -> &[DraftVariant] {
        self.draft.as_deref().unwrap_or(&self.committed)
    }

    /// Toggles one row in or out of the selection.
    pub fn select(&mut self, index: usize) {
        if index >= self.rows().len() {
            tracing::warn!(index, rows = self.rows().len(), "select out of range, ignored");
            return;
        }
        if !self.selected.insert(index) {
            self.selected.remove(&index);
        }
    }

    pub fn select_all(&mut self, on: bool) {
        if on {
            self.selected = (0..self.rows().len()).collect();
        } else {
            self.selected.clear();
        }
    }

    /// Snapshots the committed rows; later edits act on the snapshot only.
    pub fn open_draft(&mut self) {
        self.draft = Some(self.committed.clone());
    }

    /// Overwrites the price on every selected draft row. `None` and an empty
    /// selection are silent no-ops.
    pub fn apply_price_to_selected(&mut self, price: Option<Money>) {
        let Some(price) = price else { return };
        self.for_each_selected(|row| row.price = price.clone());
    }

    /// Overwrites the quantity on every selected draft row. `None` and an
    /// empty selection are silent no-ops.
    pub fn apply_quantity_to_selected(&mut self, quantity: Option<u32>) {
        let Some(quantity) = quantity else { return };
        self.for_each_selected(|row| row.quantity = quantity);
    }

    /// Single-row correction after a bulk apply.
    pub fn edit_draft_field(&mut self, index: usize, field: DraftField) {
        let Some(draft) = self.draft.as_mut() else {
            tracing::warn!(index, "edit with no open draft, ignored");
            return;
        };
        let Some(row) = draft.get_mut(index) else {
            tracing::warn!(index, "edit out of range, ignored");
            return;
        };
        match field {
            DraftField::Price(price) => row.price = price,
            DraftField::Quantity(quantity) => row.quantity = quantity,
        }
    }

    /// Replaces the committed rows with the draft and returns one record per
    /// selected row, in row order; unselected rows are not emitted. Rejects
    /// the whole commit, leaving the draft open, when a selected row carries
    /// a negative price or two selected rows collapse to the same
    /// combination.
    pub fn commit(&mut self) -> Result<Vec<VariantRecord>> {
        let rows = self.draft.as_deref().unwrap_or(&self.committed);
        let mut seen: HashMap<BTreeMap<String, i64>, usize> = HashMap::new();
        let mut emission = Vec::with_capacity(self.selected.len());
        for &index in &self.selected {
            let Some(row) = rows.get(index) else { continue };
            if row.price.is_negative() {
                return Err(VariantError::NegativePrice { row: index });
            }
            let axes: BTreeMap<String, i64> = row
                .values
                .iter()
                .filter_map(|(dim, value)| value.map(|id| (dim.clone(), id)))
                .collect();
            if let Some(&first_row) = seen.get(&axes) {
                return Err(VariantError::DuplicateCombination { first_row, second_row: index });
            }
            seen.insert(axes.clone(), index);
            emission.push(VariantRecord {
                axes,
                stock_quantity: row.quantity,
                price_override: row.price.clone(),
            });
        }
        if let Some(draft) = self.draft.take() {
            self.committed = draft;
        }
        tracing::debug!(records = emission.len(), "bulk edit committed");
        Ok(emission)
    }

    /// Discards the draft without touching the committed rows.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Re-expands the committed rows after the attribute set changed. Price
    /// and quantity survive for unchanged combinations; the open draft and
    /// the selection are dropped because row indices no longer line up.
    pub fn regenerate(&mut self, set: &AttributeSet) {
        self.committed = crate::generate::regenerate(set, &self.committed);
        self.draft = None;
        self.selected.clear();
    }

    fn for_each_selected(&mut self, mut apply: impl FnMut(&mut DraftVariant)) {
        let Some(draft) = self.draft.as_mut() else {
            tracing::warn!("bulk apply with no open draft, ignored");
            return;
        };
        for &index in &self.selected {
            if let Some(row) = draft.get_mut(index) {
                apply(row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AttributeDimension, AttributeValue, AttributeSet};
    use crate::domain::variants::ValueCombo;
    use crate::generate::generate;
    use rust_decimal::Decimal;

    fn color_size_set() -> AttributeSet {
        let mut set = AttributeSet::new();
        set.add_dimension(
            AttributeDimension::with_values(
                "color",
                vec![AttributeValue::new(1, "Red"), AttributeValue::new(2, "Blue")],
            )
            .unwrap(),
        )
        .unwrap();
        set.add_dimension(
            AttributeDimension::with_values(
                "size",
                vec![AttributeValue::new(10, "S"), AttributeValue::new(11, "M")],
            )
            .unwrap(),
        )
        .unwrap();
        set
    }

    #[test]
    fn test_bulk_apply_and_commit() {
        let set = color_size_set();
        let mut session = BulkEditSession::new(generate(&set));
        session.select(0);
        session.select(2);
        session.open_draft();
        session.apply_price_to_selected(Some(Money::usd(Decimal::new(1250, 2))));
        session.apply_quantity_to_selected(Some(30));
        session.edit_draft_field(2, DraftField::Quantity(5));

        // committed rows untouched while the draft is open
        assert!(session.committed().iter().all(|r| r.quantity == 0));

        let emission = session.commit().unwrap();
        assert_eq!(emission.len(), 2);
        assert_eq!(emission[0].stock_quantity, 30);
        assert_eq!(emission[1].stock_quantity, 5);
        assert!(emission.iter().all(|r| r.price_override.amount() == Decimal::new(1250, 2)));
        assert_eq!(session.committed()[0].quantity, 30);
        assert!(session.draft().is_none());
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let set = color_size_set();
        let mut session = BulkEditSession::new(generate(&set));
        session.open_draft();
        session.apply_price_to_selected(Some(Money::usd(Decimal::ONE)));
        session.apply_quantity_to_selected(None);
        assert_eq!(session.draft().unwrap(), session.committed());
        assert_eq!(session.commit().unwrap(), vec![]);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let set = color_size_set();
        let mut session = BulkEditSession::new(generate(&set));
        session.select_all(true);
        session.open_draft();
        session.apply_quantity_to_selected(Some(99));
        session.cancel();
        assert!(session.draft().is_none());
        assert!(session.committed().iter().all(|r| r.quantity == 0));
    }

    #[test]
    fn test_select_toggle_and_select_all() {
        let set = color_size_set();
        let mut session = BulkEditSession::new(generate(&set));
        session.select(1);
        session.select(1);
        assert!(session.selected().is_empty());
        session.select_all(true);
        assert_eq!(session.selected().len(), 4);
        session.select_all(false);
        assert!(session.selected().is_empty());
        session.select(17); // ignored
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_duplicate_combination_rejected() {
        let mut combo = ValueCombo::new();
        combo.insert("color".into(), Some(1));
        let rows = vec![DraftVariant::new(combo.clone()), DraftVariant::new(combo)];
        let mut session = BulkEditSession::new(rows);
        session.select_all(true);
        session.open_draft();
        let err = session.commit().unwrap_err();
        assert!(matches!(
            err,
            crate::VariantError::DuplicateCombination { first_row: 0, second_row: 1 }
        ));
        // draft stays open so the operator can fix it
        assert!(session.draft().is_some());
    }

    #[test]
    fn test_negative_price_rejected() {
        let set = color_size_set();
        let mut session = BulkEditSession::new(generate(&set));
        session.select(0);
        session.open_draft();
        session.apply_price_to_selected(Some(Money::usd(Decimal::new(-100, 2))));
        assert!(matches!(
            session.commit().unwrap_err(),
            crate::VariantError::NegativePrice { row: 0 }
        ));
    }

    #[test]
    fn test_regenerate_preserves_committed_edits() {
        let mut set = color_size_set();
        let mut session = BulkEditSession::new(generate(&set));
        session.select_all(true);
        session.open_draft();
        session.apply_quantity_to_selected(Some(8));
        session.commit().unwrap();

        set.push_value("color", AttributeValue::new(3, "Green")).unwrap();
        session.regenerate(&set);
        assert_eq!(session.committed().len(), 6);
        assert!(session.selected().is_empty());
        let old: Vec<_> = session
            .committed()
            .iter()
            .filter(|r| r.values["color"] != Some(3))
            .collect();
        assert!(old.iter().all(|r| r.quantity == 8));
    }
}
