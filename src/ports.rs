//! Boundary contracts to the surrounding application
//!
//! The core is synchronous; the surrounding app owns all network I/O and
//! hands these collaborators finished data. Everything else about HTTP, DB
//! and auth plumbing lives outside this crate.

use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::value_objects::AttributeValue;
use crate::domain::variants::{CartLine, PersistedVariant, VariantRecord};
use crate::{Result, VariantError};

/// Catalog read side: the persisted variants of one product, the input to an
/// [`crate::AvailabilityIndex`] rebuild.
pub trait CatalogRead {
    fn persisted_variants(&self, product_id: Uuid) -> Result<Vec<PersistedVariant>>;
}

/// Attribute value catalogs (colors, sizes, ...), keyed by dimension name.
/// `create_value` is the side-channel write that mints a new id to append to
/// the corresponding dimension.
pub trait AttributeCatalog {
    fn values(&self, dimension: &str) -> Result<Vec<AttributeValue>>;
    fn create_value(&mut self, dimension: &str, label: &str) -> Result<AttributeValue>;
}

/// Variant write side, consuming a commit emission one record at a time.
/// Last-variant deletion protection is the caller's policy, not enforced
/// here.
pub trait VariantWrite {
    fn create_variant(&mut self, product_id: Uuid, record: &VariantRecord) -> Result<Uuid>;
    fn update_variant(&mut self, id: Uuid, record: &VariantRecord) -> Result<()>;
    fn delete_variant(&mut self, id: Uuid) -> Result<()>;
}

/// Shopper cart. Setting a line to quantity 0 removes it.
pub trait CartStore {
    fn lines(&self) -> Result<Vec<CartLine>>;
    fn set_line_quantity(&mut self, variant_id: Uuid, quantity: u32) -> Result<()>;
}

/// Pushes a [`crate::BulkEditSession::commit`] emission to the backend,
/// updating the existing variant with the same axes where one exists and
/// creating the rest. Stale variants are left for the caller to delete.
pub fn persist_emission<W: VariantWrite>(
    product_id: Uuid,
    records: &[VariantRecord],
    existing: &[PersistedVariant],
    writer: &mut W,
) -> Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        match existing.iter().find(|v| v.axes == record.axes) {
            Some(current) => {
                writer.update_variant(current.id, record)?;
                ids.push(current.id);
            }
            None => ids.push(writer.create_variant(product_id, record)?),
        }
    }
    Ok(ids)
}

// =============================================================================
// In-memory reference implementations
// =============================================================================

/// In-memory attribute catalogs and variant store, used by this crate's tests
/// and usable as a test double downstream.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    catalogs: HashMap<String, Vec<AttributeValue>>,
    next_value_id: i64,
    variants: HashMap<Uuid, (Uuid, PersistedVariant)>,
}

impl InMemoryCatalog {
    pub fn with_dimensions(dimensions: &[&str]) -> Self {
        let catalogs = dimensions.iter().map(|d| (d.to_string(), Vec::new())).collect();
        Self { catalogs, next_value_id: 1, variants: HashMap::new() }
    }
}

impl AttributeCatalog for InMemoryCatalog {
    fn values(&self, dimension: &str) -> Result<Vec<AttributeValue>> {
        self.catalogs
            .get(dimension)
            .cloned()
            .ok_or_else(|| VariantError::UnknownDimension(dimension.to_string()))
    }

    fn create_value(&mut self, dimension: &str, label: &str) -> Result<AttributeValue> {
        let catalog = self
            .catalogs
            .get_mut(dimension)
            .ok_or_else(|| VariantError::UnknownDimension(dimension.to_string()))?;
        let value = AttributeValue::new(self.next_value_id, label);
        self.next_value_id += 1;
        catalog.push(value.clone());
        Ok(value)
    }
}

impl CatalogRead for InMemoryCatalog {
    fn persisted_variants(&self, product_id: Uuid) -> Result<Vec<PersistedVariant>> {
        let mut out: Vec<PersistedVariant> = self
            .variants
            .values()
            .filter(|(owner, _)| *owner == product_id)
            .map(|(_, v)| v.clone())
            .collect();
        out.sort_by(|a, b| a.axes.cmp(&b.axes));
        Ok(out)
    }
}

impl VariantWrite for InMemoryCatalog {
    fn create_variant(&mut self, product_id: Uuid, record: &VariantRecord) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let variant = PersistedVariant::new(
            id,
            record.axes.clone(),
            record.stock_quantity,
            record.price_override.clone(),
        );
        self.variants.insert(id, (product_id, variant));
        Ok(id)
    }

    fn update_variant(&mut self, id: Uuid, record: &VariantRecord) -> Result<()> {
        let (_, variant) = self
            .variants
            .get_mut(&id)
            .ok_or(VariantError::VariantNotFound(id))?;
        variant.axes = record.axes.clone();
        variant.stock_quantity = record.stock_quantity;
        variant.price = record.price_override.clone();
        Ok(())
    }

    fn delete_variant(&mut self, id: Uuid) -> Result<()> {
        self.variants
            .remove(&id)
            .map(|_| ())
            .ok_or(VariantError::VariantNotFound(id))
    }
}

/// In-memory cart keeping the quantity ≥ 1 invariant.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCart {
    lines: Vec<CartLine>,
}

impl CartStore for InMemoryCart {
    fn lines(&self) -> Result<Vec<CartLine>> {
        Ok(self.lines.clone())
    }

    fn set_line_quantity(&mut self, variant_id: Uuid, quantity: u32) -> Result<()> {
        if quantity == 0 {
            self.lines.retain(|l| l.variant_id != variant_id);
            return Ok(());
        }
        match self.lines.iter_mut().find(|l| l.variant_id == variant_id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine { variant_id, quantity }),
        }
        Ok(())
    }
}
