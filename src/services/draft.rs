use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::{Address, Booking, BookingDraft, BookingStatus, Party, PaymentMethod};
use crate::services::pricing::calculate_total;

/// Holds at most one in-progress draft for a party.
///
/// Owned by whoever drives the wizard; there is no shared global slot.
#[derive(Debug, Default)]
pub struct DraftSlot {
    draft: Option<BookingDraft>,
}

impl DraftSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh draft, replacing whatever was there.
    pub fn start(
        &mut self,
        service_id: &str,
        service_name: &str,
        price: Decimal,
        duration: &str,
        discount: Option<Decimal>,
    ) -> &BookingDraft {
        self.draft.insert(BookingDraft {
            service_id: service_id.to_string(),
            service_name: service_name.to_string(),
            price,
            discount,
            duration: duration.to_string(),
            date: None,
            time: None,
            address: None,
            instructions: None,
        })
    }

    pub fn set_schedule(&mut self, date: NaiveDate, time: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.date = Some(date);
            draft.time = Some(time.to_string());
        }
    }

    pub fn set_address(&mut self, address: Address, instructions: Option<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.address = Some(address);
            draft.instructions = instructions;
        }
    }

    pub fn get(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    pub fn clear(&mut self) {
        self.draft = None;
    }
}

/// Who fulfils the booking.
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: String,
    pub name: String,
}

/// Turns a complete draft into the booking record sent to the backend.
///
/// Returns `None` when the schedule or address step has not been done.
pub fn build_booking(
    draft: &BookingDraft,
    requester: &Party,
    provider: &Provider,
    payment: PaymentMethod,
    now: DateTime<Utc>,
) -> Option<Booking> {
    let (Some(date), Some(time), Some(address)) =
        (draft.date, draft.time.as_ref(), draft.address.as_ref())
    else {
        return None;
    };

    Some(Booking {
        id: format!("BK{}", uuid::Uuid::new_v4().simple()),
        user_id: requester.id.clone(),
        partner_id: provider.id.clone(),
        partner_name: provider.name.clone(),
        customer_name: requester.display_name.clone(),
        service_id: draft.service_id.clone(),
        service_name: draft.service_name.clone(),
        date,
        time: time.clone(),
        duration: draft.duration.clone(),
        address: address.clone(),
        additional_instructions: draft.instructions.clone(),
        amount: calculate_total(Some(draft)).total,
        payment_method: payment.label().to_string(),
        status: BookingStatus::Confirmed,
        created_at: now,
    })
}
