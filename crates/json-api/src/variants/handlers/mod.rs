//! Variant Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod disabled_dates;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod quote;
pub(crate) mod update;
