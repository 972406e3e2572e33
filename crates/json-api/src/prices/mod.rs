//! Price Lists

mod handlers;

pub(crate) use handlers::*;
