//! Booking Data

/// Checkout Customer Data
///
/// Contact details captured at checkout; a cart carries none until then.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutCustomer {
    pub name: String,
    pub email: String,
}
