//! Extension traits

mod date_param;
mod depot;
mod point_in_time;
mod result;

pub(crate) use date_param::DateParamExt as _;
pub(crate) use depot::DepotExt as _;
pub(crate) use point_in_time::PointInTimeExt as _;
pub(crate) use result::ResultExt as _;
