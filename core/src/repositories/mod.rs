pub mod booking;
pub mod kv_store;

pub use booking::{BookingRepository, MockBookingRepository};
pub use kv_store::{KeyValueStore, MockKeyValueStore};
