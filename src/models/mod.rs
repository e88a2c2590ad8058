pub mod address;
pub mod booking;
pub mod draft;
pub mod notification;
pub mod offer;
pub mod party;
pub mod payment;
pub mod review;

pub use address::{Address, AddressType};
pub use booking::{Booking, BookingStatus, StatusFilter};
pub use draft::BookingDraft;
pub use notification::Notification;
pub use offer::ServiceOffer;
pub use party::{Party, Role};
pub use payment::PaymentMethod;
pub use review::Review;
