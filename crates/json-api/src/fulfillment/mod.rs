//! Fulfillment

mod handlers;

pub(crate) use handlers::*;
