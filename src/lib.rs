//! Storefront Variants
//!
//! Variant combination and stock-constrained selection engine for an
//! e-commerce storefront and its admin console.
//!
//! ## Features
//! - Cartesian expansion of attribute dimensions into draft variants
//! - Bulk price/stock editing with draft/commit preview
//! - Availability index over persisted variants (reachability + matching)
//! - Storefront selection state machine with incompatible-pick reset
//! - Cart quantity reconciliation against live stock
//!
//! The crate is a library invoked by UI event handlers; HTTP, persistence
//! and auth belong to the surrounding application (see [`ports`]).

use thiserror::Error;
use uuid::Uuid;

pub mod availability;
pub mod bulk_edit;
pub mod domain;
pub mod generate;
pub mod ports;
pub mod reconcile;
pub mod selection;

pub use availability::{AvailabilityIndex, FallbackPolicy};
pub use bulk_edit::{BulkEditSession, DraftField};
pub use domain::value_objects::{AttributeDimension, AttributeSet, AttributeValue, Money, Sku};
pub use domain::variants::{CartLine, DraftVariant, PersistedVariant, ValueCombo, VariantRecord};
pub use generate::{generate, regenerate};
pub use reconcile::{apply_to_cart, reconcile, CartAction, QuantityRequest};
pub use selection::{Selection, SelectionController};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum VariantError {
    #[error("duplicate variant combination (rows {first_row} and {second_row})")]
    DuplicateCombination { first_row: usize, second_row: usize },

    #[error("negative price on row {row}")]
    NegativePrice { row: usize },

    #[error("selection holds unreachable value {value_id} for dimension '{dimension}'")]
    UnreachableSelection { dimension: String, value_id: i64 },

    #[error("no variant selected")]
    NoVariantSelected,

    #[error("requested {requested} exceeds stock: {stock} available, {in_cart} already in cart")]
    StockExceeded {
        requested: u32,
        stock: u32,
        in_cart: u32,
    },

    #[error("variant {0} not found")]
    VariantNotFound(Uuid),

    #[error("unknown attribute dimension '{0}'")]
    UnknownDimension(String),
}

pub type Result<T> = std::result::Result<T, VariantError>;
