use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Address;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub partner_id: String,
    pub partner_name: String,
    /// Requester's display name; empty on records written before it was kept.
    #[serde(default)]
    pub customer_name: String,
    pub service_id: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    pub amount: Decimal,
    pub payment_method: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Upcoming,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(alias = "Canceled")]
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Upcoming,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Upcoming => "Upcoming",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(BookingStatus::Pending),
            "Confirmed" => Some(BookingStatus::Confirmed),
            "Upcoming" => Some(BookingStatus::Upcoming),
            "In Progress" => Some(BookingStatus::InProgress),
            "Completed" => Some(BookingStatus::Completed),
            "Cancelled" | "Canceled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses a provider (or a cancelling customer) may move a booking to.
    pub fn next_statuses(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Confirmed => &[BookingStatus::InProgress, BookingStatus::Cancelled],
            BookingStatus::InProgress => &[BookingStatus::Completed, BookingStatus::Cancelled],
            _ => &[],
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.next_statuses().contains(&next)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter applied by the booking store.
///
/// Matching is exact: a value that names no known status is kept verbatim
/// and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Status(BookingStatus),
    Unmatched(String),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Self {
        if s == "all" {
            return StatusFilter::All;
        }
        match BookingStatus::parse(s) {
            Some(status) => StatusFilter::Status(status),
            None => StatusFilter::Unmatched(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Status(status) => status.as_str(),
            StatusFilter::Unmatched(raw) => raw,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(status) => booking.status == *status,
            StatusFilter::Unmatched(_) => false,
        }
    }
}
