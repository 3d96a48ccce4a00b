pub mod payment;

pub use payment::{Amount, GlResponse, PaymentRecord};
