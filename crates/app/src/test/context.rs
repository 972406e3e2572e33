//! Test context for service-level integration tests.

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::Db,
    domain::{
        availability::PgAvailabilityService,
        bookings::PgBookingsService,
        carts::PgCartsService,
        catalog::PgCatalogService,
        pricing::PgPricingService,
        tenants::{PgTenantsService, TenantsService, data::NewTenant, records::TenantUuid},
        units::PgUnitsService,
    },
};

use super::db::TestDb;

/// Name of the non-superuser app role used for RLS testing.
const APP_ROLE: &str = "noleggio_app_test";
const APP_ROLE_PASSWORD: &str = "noleggio_app_test_pass";

pub struct TestContext {
    pub db: TestDb,
    pub tenant_uuid: TenantUuid,
    pub catalog: PgCatalogService,
    pub units: PgUnitsService,
    pub pricing: PgPricingService,
    pub availability: PgAvailabilityService,
    pub carts: PgCartsService,
    pub bookings: PgBookingsService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;

        // Build a non-superuser app pool so RLS policies are enforced.
        // The superuser pool is only used for administrative setup.
        let app_pool = Self::setup_app_pool(&test_db).await;
        let db = Db::new(app_pool);

        let tenant_uuid = TenantUuid::new();

        PgTenantsService::new(test_db.pool().clone())
            .create_tenant(NewTenant {
                uuid: tenant_uuid,
                name: "Test Tenant".to_string(),
            })
            .await
            .expect("Failed to create default test tenant");

        Self {
            catalog: PgCatalogService::new(db.clone()),
            units: PgUnitsService::new(db.clone()),
            pricing: PgPricingService::new(db.clone()),
            availability: PgAvailabilityService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            bookings: PgBookingsService::new(db),
            tenant_uuid,
            db: test_db,
        }
    }

    /// Create an additional tenant for cross-tenant isolation tests.
    pub async fn create_tenant(&self, name: &str) -> TenantUuid {
        let uuid = TenantUuid::new();

        PgTenantsService::new(self.db.pool().clone())
            .create_tenant(NewTenant {
                uuid,
                name: name.to_string(),
            })
            .await
            .expect("Failed to create test tenant");

        uuid
    }

    /// Create a non-superuser role (once per server) and return a pool
    /// connected as it.
    ///
    /// PostgreSQL superusers bypass RLS even with `FORCE ROW LEVEL
    /// SECURITY`, so service tests that exercise tenant isolation must
    /// connect via this restricted role.
    async fn setup_app_pool(test_db: &TestDb) -> PgPool {
        // `superuser_url` points at the test database as the superuser.
        let su_url = &test_db.superuser_url;

        // CREATE ROLE is server-scoped, so run it against the
        // `postgres` maintenance database.
        let postgres_url = su_url.rsplit_once('/').map(|x| x.0).unwrap_or(su_url);
        let postgres_url = format!("{postgres_url}/postgres");

        let mut server_conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to postgres database for role setup");

        // Parallel tests race on role creation. "Role already exists"
        // (42710) and the underlying unique violation (23505) both mean
        // the role is present, which is all that matters.
        let create_result = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
               NOSUPERUSER NOCREATEDB NOCREATEROLE"
        ))
        .execute(&mut server_conn)
        .await;

        if let Err(sqlx::Error::Database(ref e)) = create_result {
            if !matches!(e.code().as_deref(), Some("42710") | Some("23505")) {
                create_result.expect("Failed to create app role");
            }
        } else {
            create_result.expect("Failed to create app role");
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            test_db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT on test database");

        server_conn
            .close()
            .await
            .expect("Failed to close server connection");

        // Within the test database, grant schema and table privileges.
        let mut db_conn = PgConnection::connect(su_url)
            .await
            .expect("Failed to connect to test database for privilege setup");

        for stmt in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!(
                "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"
            ),
            format!("GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {APP_ROLE}"),
        ] {
            query(&stmt)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant table privileges to app role");
        }

        db_conn
            .close()
            .await
            .expect("Failed to close db connection");

        let app_url = su_url.replacen(
            "noleggio_test:noleggio_test_password",
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to create app pool")
    }
}
