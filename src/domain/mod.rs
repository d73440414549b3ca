pub mod callback;
pub mod context;
pub mod method;
pub mod otp;
pub mod ports;
pub mod processing;
pub mod query;
