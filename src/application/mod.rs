//! Application layer: the three stages of the checkout flow.
//!
//! Each stage is mounted from query parameters alone, owns its timers through
//! a [`scope::StageScope`], and hands back a [`navigation::Navigation`] when
//! it is done. [`flow::CheckoutFlow`] chains them together.

pub mod flow;
pub mod navigation;
pub mod processing;
pub mod scope;
pub mod selection;
pub mod verification;
