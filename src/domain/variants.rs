//! Variant records shared between authoring and storefront

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::value_objects::{AttributeSet, Money, Sku};
use crate::selection::Selection;

/// Dimension name → picked value id. `None` is the slot a dimension with no
/// configured values contributes to the Cartesian product.
pub type ValueCombo = BTreeMap<String, Option<i64>>;

/// A generated, not-yet-persisted combination with editable price and stock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftVariant {
    pub values: ValueCombo,
    pub price: Money,
    pub quantity: u32,
}

impl DraftVariant {
    pub fn new(values: ValueCombo) -> Self {
        Self { values, price: Money::default(), quantity: 0 }
    }

    /// Display title like "Red / M", resolved against the attribute set.
    pub fn title(&self, set: &AttributeSet) -> String {
        let labels: Vec<&str> = set
            .dimensions()
            .iter()
            .filter_map(|dim| {
                self.values
                    .get(dim.name())
                    .copied()
                    .flatten()
                    .and_then(|id| dim.label_of(id))
            })
            .collect();
        labels.join(" / ")
    }
}

/// A backend-stored, purchasable combination with live stock. Read-only input
/// to the core; `axes` holds one value id per applicable dimension, and a
/// dimension missing from `axes` means "not applicable" (wildcard).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedVariant {
    pub id: Uuid,
    pub axes: BTreeMap<String, i64>,
    pub stock_quantity: u32,
    pub price: Money,
    #[serde(default)]
    pub sku: Option<Sku>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedVariant {
    pub fn new(id: Uuid, axes: BTreeMap<String, i64>, stock_quantity: u32, price: Money) -> Self {
        Self {
            id,
            axes,
            stock_quantity,
            price,
            sku: None,
            barcode: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_in_stock(&self) -> bool { self.stock_quantity > 0 }

    pub fn value_on(&self, dimension: &str) -> Option<i64> {
        self.axes.get(dimension).copied()
    }

    /// Consistent with every fixed dimension of `selection`, ignoring
    /// `except`. An absent axis is compatible with anything.
    pub fn matches(&self, selection: &Selection, except: Option<&str>) -> bool {
        selection.iter().all(|(dim, value)| {
            if Some(dim) == except {
                return true;
            }
            match self.axes.get(dim) {
                None => true,
                Some(&v) => v == value,
            }
        })
    }
}

/// One row of a [`crate::BulkEditSession::commit`] emission, consumed by the
/// variant-write collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    pub axes: BTreeMap<String, i64>,
    pub stock_quantity: u32,
    pub price_override: Money,
}

/// One cart entry for a variant. The cart collaborator keeps quantity ≥ 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub variant_id: Uuid,
    pub quantity: u32,
}
