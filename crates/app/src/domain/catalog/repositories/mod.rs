//! Catalog Repositories

mod products;
mod variants;

pub(crate) use products::PgProductsRepository;
pub(crate) use variants::PgVariantsRepository;
