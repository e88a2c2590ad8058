use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::BookingDraft;

/// Flat surcharge added to every booking.
pub const CONVENIENCE_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub convenience_fee: Decimal,
    pub total: Decimal,
}

/// Prices a draft. No draft prices to all zeroes.
///
/// The total is not floored: a discount above the subtotal yields a total
/// below the fee.
pub fn calculate_total(draft: Option<&BookingDraft>) -> PriceBreakdown {
    let Some(draft) = draft else {
        return PriceBreakdown::default();
    };

    let subtotal = draft.price;
    let discount = draft.discount.unwrap_or(Decimal::ZERO);
    let convenience_fee = CONVENIENCE_FEE;

    PriceBreakdown {
        subtotal,
        discount,
        convenience_fee,
        total: subtotal - discount + convenience_fee,
    }
}
