//! Groups bookings into the tabs each role sees.
//!
//! Tab membership is derived from the live status plus how many days away the
//! booking is; nothing here is stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Booking, BookingStatus, Role};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tab {
    All,
    Pending,
    Upcoming,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(alias = "Canceled")]
    Cancelled,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::All => "All",
            Tab::Pending => "Pending",
            Tab::Upcoming => "Upcoming",
            Tab::InProgress => "In Progress",
            Tab::Completed => "Completed",
            Tab::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "All" | "all" => Some(Tab::All),
            "Pending" => Some(Tab::Pending),
            "Upcoming" => Some(Tab::Upcoming),
            "In Progress" => Some(Tab::InProgress),
            "Completed" => Some(Tab::Completed),
            "Cancelled" | "Canceled" => Some(Tab::Cancelled),
            _ => None,
        }
    }
}

/// Inclusive bounds on the day offset between a booking and today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayWindow {
    Any,
    AtLeast(i64),
    Between(i64, i64),
}

impl DayWindow {
    fn contains(&self, days: i64) -> bool {
        match *self {
            DayWindow::Any => true,
            DayWindow::AtLeast(min) => days >= min,
            DayWindow::Between(min, max) => (min..=max).contains(&days),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TabRule {
    pub tab: Tab,
    pub window: DayWindow,
    pub statuses: &'static [BookingStatus],
}

const PARTNER_RULES: &[TabRule] = &[
    TabRule {
        tab: Tab::Pending,
        window: DayWindow::AtLeast(2),
        statuses: &[BookingStatus::Confirmed],
    },
    TabRule {
        tab: Tab::Upcoming,
        window: DayWindow::Between(0, 1),
        statuses: &[BookingStatus::Confirmed, BookingStatus::InProgress],
    },
    TabRule {
        tab: Tab::Completed,
        window: DayWindow::Any,
        statuses: &[BookingStatus::Completed],
    },
    TabRule {
        tab: Tab::Cancelled,
        window: DayWindow::Any,
        statuses: &[BookingStatus::Cancelled],
    },
];

const CUSTOMER_RULES: &[TabRule] = &[
    TabRule {
        tab: Tab::Upcoming,
        window: DayWindow::Any,
        statuses: &[
            BookingStatus::Upcoming,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
        ],
    },
    TabRule {
        tab: Tab::InProgress,
        window: DayWindow::Any,
        statuses: &[BookingStatus::InProgress],
    },
    TabRule {
        tab: Tab::Completed,
        window: DayWindow::Any,
        statuses: &[BookingStatus::Completed],
    },
    TabRule {
        tab: Tab::Cancelled,
        window: DayWindow::Any,
        statuses: &[BookingStatus::Cancelled],
    },
];

/// Whole days from `today` to `date`. Negative for past bookings.
pub fn days_diff(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    rules: &'static [TabRule],
}

impl Classifier {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Partner => Self::new(PARTNER_RULES),
            Role::Customer => Self::new(CUSTOMER_RULES),
        }
    }

    pub fn new(rules: &'static [TabRule]) -> Self {
        Self { rules }
    }

    /// Tabs in display order, `All` first.
    pub fn tabs(&self) -> Vec<Tab> {
        std::iter::once(Tab::All)
            .chain(self.rules.iter().map(|r| r.tab))
            .collect()
    }

    /// Tabs without a rule for this role match nothing, except `All`.
    pub fn matches(&self, booking: &Booking, tab: Tab, today: NaiveDate) -> bool {
        if tab == Tab::All {
            return true;
        }

        let days = days_diff(booking.date, today);
        self.rules
            .iter()
            .filter(|r| r.tab == tab)
            .any(|r| r.window.contains(days) && r.statuses.contains(&booking.status))
    }

    pub fn select<'a>(
        &self,
        bookings: &'a [Booking],
        tab: Tab,
        today: NaiveDate,
    ) -> Vec<&'a Booking> {
        bookings
            .iter()
            .filter(|b| self.matches(b, tab, today))
            .collect()
    }

    pub fn tab_counts(&self, bookings: &[Booking], today: NaiveDate) -> Vec<(Tab, usize)> {
        self.tabs()
            .into_iter()
            .map(|tab| (tab, self.select(bookings, tab, today).len()))
            .collect()
    }
}

/// Case-insensitive match over booking id, service name and the name of the
/// other party: the customer for partners, the partner for customers.
/// A blank query matches everything.
pub fn matches_search(booking: &Booking, query: &str, viewer: Role) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let counterpart = match viewer {
        Role::Partner => &booking.customer_name,
        Role::Customer => &booking.partner_name,
    };

    [&booking.id, &booking.service_name, counterpart]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}
