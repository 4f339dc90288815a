//! Repository implementations over infrastructure stores

mod booking;

pub use booking::KvBookingRepository;
