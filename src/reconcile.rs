//! Cart quantity reconciliation against live stock
//!
//! Invoked immediately before any cart-mutating action, with the variant the
//! selection controller currently reports as matched. Nothing is mutated on
//! rejection; the caller renders the error inline.

use crate::domain::variants::{CartLine, PersistedVariant};
use crate::ports::CartStore;
use crate::{Result, VariantError};

/// What the shopper asked for: an absolute quantity, or a change relative to
/// what the cart already holds for the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityRequest {
    SetTo(u32),
    AdjustBy(i64),
}

/// The cart mutation the reconciler allows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartAction {
    Set(u32),
    Remove,
}

/// Clamps or rejects a quantity request against `matched`'s stock and the
/// quantity already held in `line`.
///
/// - no matched variant ⇒ [`VariantError::NoVariantSelected`], before stock
///   is even considered;
/// - an absolute request is clamped into `1..=stock` (zero removes the line);
/// - a relative request that would push the held total past stock is rejected
///   with [`VariantError::StockExceeded`], reporting the held quantity so the
///   caller can say "you already have N in your cart";
/// - any result below 1 removes the line rather than erroring.
pub fn reconcile(
    matched: Option<&PersistedVariant>,
    request: QuantityRequest,
    line: Option<&CartLine>,
) -> Result<CartAction> {
    let variant = matched.ok_or(VariantError::NoVariantSelected)?;
    let stock = variant.stock_quantity;
    let held = line.map(|l| l.quantity).unwrap_or(0);
    match request {
        QuantityRequest::SetTo(0) => Ok(CartAction::Remove),
        QuantityRequest::SetTo(quantity) => {
            if stock == 0 {
                return Err(VariantError::StockExceeded { requested: quantity, stock, in_cart: held });
            }
            Ok(CartAction::Set(quantity.clamp(1, stock)))
        }
        QuantityRequest::AdjustBy(delta) => {
            let total = i64::from(held) + delta;
            if total < 1 {
                return Ok(CartAction::Remove);
            }
            if total > i64::from(stock) {
                return Err(VariantError::StockExceeded {
                    requested: u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX),
                    stock,
                    in_cart: held,
                });
            }
            Ok(CartAction::Set(total as u32))
        }
    }
}

/// Reconciles against the live cart and applies the outcome through the cart
/// collaborator. Returns the action that was applied.
pub fn apply_to_cart<C: CartStore>(
    matched: Option<&PersistedVariant>,
    request: QuantityRequest,
    cart: &mut C,
) -> Result<CartAction> {
    let variant = matched.ok_or(VariantError::NoVariantSelected)?;
    let lines = cart.lines()?;
    let line = lines.iter().find(|l| l.variant_id == variant.id);
    let action = reconcile(Some(variant), request, line)?;
    match action {
        CartAction::Set(quantity) => cart.set_line_quantity(variant.id, quantity)?,
        CartAction::Remove => cart.set_line_quantity(variant.id, 0)?,
    }
    Ok(action)
}
