//! Plain data: order sessions and the pricing catalog.

pub mod catalog;
pub mod order;

pub use catalog::*;
pub use order::*;
