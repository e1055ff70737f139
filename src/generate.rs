//! Cartesian expansion of an attribute set into draft variants

use std::collections::HashMap;

use crate::domain::value_objects::AttributeSet;
use crate::domain::variants::{DraftVariant, ValueCombo};

/// Expands `set` into one draft per element of the Cartesian product.
///
/// Output order is lexicographic by dimension declaration order, then by each
/// dimension's value order, and is stable across re-generation so row indices
/// stay meaningful between renders. A dimension with zero configured values
/// contributes a single absent slot instead of emptying the whole product;
/// zero dimensions yield no variants at all.
pub fn generate(set: &AttributeSet) -> Vec<DraftVariant> {
    if set.dimensions().is_empty() {
        return Vec::new();
    }
    let mut combos: Vec<ValueCombo> = vec![ValueCombo::new()];
    for dim in set.dimensions() {
        let slots: Vec<Option<i64>> = if dim.is_empty() {
            vec![None]
        } else {
            dim.values().iter().map(|v| Some(v.id)).collect()
        };
        let mut next = Vec::with_capacity(combos.len() * slots.len());
        for combo in &combos {
            for slot in &slots {
                let mut extended = combo.clone();
                extended.insert(dim.name().to_string(), *slot);
                next.push(extended);
            }
        }
        combos = next;
    }
    combos.into_iter().map(DraftVariant::new).collect()
}

/// Re-expands after the attribute set changed, carrying price and quantity
/// over for every combination that already existed. New combinations start at
/// zero price and zero quantity.
pub fn regenerate(set: &AttributeSet, previous: &[DraftVariant]) -> Vec<DraftVariant> {
    let by_combo: HashMap<&ValueCombo, &DraftVariant> =
        previous.iter().map(|d| (&d.values, d)).collect();
    let mut fresh = generate(set);
    for draft in &mut fresh {
        if let Some(old) = by_combo.get(&draft.values) {
            draft.price = old.price.clone();
            draft.quantity = old.quantity;
        }
    }
    fresh
}
