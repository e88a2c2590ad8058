use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Booking, Party};

/// A customer's rating of a completed booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub partner_id: String,
    pub partner_name: String,
    pub customer_name: String,
    pub service_name: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub const MAX_RATING: u8 = 5;

    /// Builds a review of `booking` by `author`. Rating must be 1 to 5.
    pub fn new(
        booking: &Booking,
        author: &Party,
        rating: u8,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        if !(1..=Self::MAX_RATING).contains(&rating) {
            return Err(format!("rating must be between 1 and {}", Self::MAX_RATING));
        }

        let customer_name = if author.display_name.trim().is_empty() {
            "Customer".to_string()
        } else {
            author.display_name.clone()
        };

        Ok(Self {
            id: format!("REV{}", uuid::Uuid::new_v4().simple()),
            booking_id: booking.id.clone(),
            user_id: author.id.clone(),
            partner_id: booking.partner_id.clone(),
            partner_name: booking.partner_name.clone(),
            customer_name,
            service_name: booking.service_name.clone(),
            rating,
            comment: comment.filter(|c| !c.trim().is_empty()),
            created_at: now,
        })
    }
}
