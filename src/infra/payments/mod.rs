//! Payment processor integration (Stripe hosted checkout).

mod error;
pub mod params;
mod signature;
mod stripe;

pub use error::PaymentError;
pub use signature::verify_signature;
pub use stripe::{PaymentGateway, StripeGateway};

#[cfg(any(test, feature = "test-utils"))]
pub use stripe::MockPaymentGateway;
