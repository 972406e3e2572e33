//! Fulfillment Handlers

pub(crate) mod pickup;
pub(crate) mod pickups;
pub(crate) mod ret;
pub(crate) mod returns;
