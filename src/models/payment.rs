use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Cash,
}

impl PaymentMethod {
    /// Label recorded on the booking.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Cash => "Pay on Service",
        }
    }
}
