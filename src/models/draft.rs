use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Address;

/// A booking under construction across the service, schedule, address and
/// payment steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub service_id: String,
    pub service_name: String,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub duration: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub address: Option<Address>,
    pub instructions: Option<String>,
}

impl BookingDraft {
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some() && self.address.is_some()
    }
}
