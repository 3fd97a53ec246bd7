pub mod projector;

#[cfg(feature = "payout")]
pub mod payout;
