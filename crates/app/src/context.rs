//! Application context.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        availability::{AvailabilityService, PgAvailabilityService},
        bookings::{BookingsService, PgBookingsService},
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        pricing::{PgPricingService, PricingService},
        units::{PgUnitsService, UnitsService},
    },
};

/// Shared handles to the domain services.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub availability: Arc<dyn AvailabilityService>,
    pub bookings: Arc<dyn BookingsService>,
    pub carts: Arc<dyn CartsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub pricing: Arc<dyn PricingService>,
    pub units: Arc<dyn UnitsService>,
}

/// Errors raised while wiring up the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl AppContext {
    /// Connect to the database and wire up the domain services.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or if the connected role
    /// would bypass row-level security.
    pub async fn from_database_url(database_url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(database_url).await?;

        database::ensure_rls_enforced_role(&pool).await?;

        let db = Db::new(pool.clone());

        Ok(Self {
            auth: Arc::new(PgAuthService::new(pool)),
            availability: Arc::new(PgAvailabilityService::new(db.clone())),
            bookings: Arc::new(PgBookingsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            pricing: Arc::new(PgPricingService::new(db.clone())),
            units: Arc::new(PgUnitsService::new(db)),
        })
    }
}
