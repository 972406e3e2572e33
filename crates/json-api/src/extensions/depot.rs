//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use noleggio_app::domain::tenants::records::TenantUuid;

const TENANT_UUID_KEY: &str = "tenant_uuid";

/// Helpers for moving request-scoped values through the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the authenticated tenant for downstream handlers.
    fn insert_tenant_uuid(&mut self, tenant: TenantUuid);

    /// The tenant the auth middleware resolved, or 401 when it never ran.
    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid) {
        self.insert(TENANT_UUID_KEY, tenant);
    }

    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError> {
        self.get::<TenantUuid>(TENANT_UUID_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
