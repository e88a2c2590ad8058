use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A service's advertised price and whatever offer is attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffer {
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    /// Display label such as "20% OFF".
    #[serde(default)]
    pub discount: Option<String>,
}

impl ServiceOffer {
    /// Resolves the offer to the absolute discount a draft carries.
    ///
    /// An original price wins over a percentage label.
    pub fn discount_amount(&self) -> Decimal {
        if let Some(original) = self.original_price {
            return original - self.price;
        }

        self.discount
            .as_deref()
            .and_then(parse_percentage)
            .map(|pct| self.price * pct / Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO)
    }
}

fn parse_percentage(label: &str) -> Option<Decimal> {
    let (number, _) = label.split_once('%')?;
    number.trim().parse().ok()
}
