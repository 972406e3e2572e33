//! Test helpers.
//!
//! Handler tests run against a `State` whose services are all mockall
//! mocks. Mocks have no default expectations, so any call a test did
//! not explicitly expect panics and fails the test.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use noleggio_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        availability::MockAvailabilityService,
        bookings::{
            MockBookingsService,
            records::{
                AgendaItemRecord, BookingDetailRecord, BookingDetailUuid, BookingRecord,
                BookingStatus, BookingUuid, FulfillmentStatus,
            },
        },
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid},
        },
        catalog::{
            MockCatalogService,
            records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
        },
        pricing::{
            MockPricingService,
            records::{PricePeriod, PriceRecord, PriceUuid},
        },
        tenants::records::TenantUuid,
        units::{
            MockUnitsService,
            records::{UnitRecord, UnitStatus, UnitUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_tenant(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// One mock per service; swap in configured mocks before `into_state`.
pub(crate) struct MockApp {
    pub auth: MockAuthService,
    pub availability: MockAvailabilityService,
    pub bookings: MockBookingsService,
    pub carts: MockCartsService,
    pub catalog: MockCatalogService,
    pub pricing: MockPricingService,
    pub units: MockUnitsService,
}

impl Default for MockApp {
    fn default() -> Self {
        Self {
            auth: MockAuthService::new(),
            availability: MockAvailabilityService::new(),
            bookings: MockBookingsService::new(),
            carts: MockCartsService::new(),
            catalog: MockCatalogService::new(),
            pricing: MockPricingService::new(),
            units: MockUnitsService::new(),
        }
    }
}

impl MockApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        Arc::new(State::new(AppContext {
            auth: Arc::new(self.auth),
            availability: Arc::new(self.availability),
            bookings: Arc::new(self.bookings),
            carts: Arc::new(self.carts),
            catalog: Arc::new(self.catalog),
            pricing: Arc::new(self.pricing),
            units: Arc::new(self.units),
        }))
    }

    /// A service routing `route` behind the injected test tenant.
    pub(crate) fn into_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_tenant)
                .push(route),
        )
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    MockApp {
        auth,
        ..MockApp::default()
    }
    .into_state()
}

pub(crate) fn catalog_service(catalog: MockCatalogService, route: Router) -> Service {
    MockApp {
        catalog,
        ..MockApp::default()
    }
    .into_service(route)
}

pub(crate) fn units_service(units: MockUnitsService, route: Router) -> Service {
    MockApp {
        units,
        ..MockApp::default()
    }
    .into_service(route)
}

pub(crate) fn pricing_service(pricing: MockPricingService, route: Router) -> Service {
    MockApp {
        pricing,
        ..MockApp::default()
    }
    .into_service(route)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    MockApp {
        carts,
        ..MockApp::default()
    }
    .into_service(route)
}

pub(crate) fn bookings_service(bookings: MockBookingsService, route: Router) -> Service {
    MockApp {
        bookings,
        ..MockApp::default()
    }
    .into_service(route)
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Party tent".to_string(),
        category: Some("Tents".to_string()),
        description: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_variant(uuid: VariantUuid, product_uuid: ProductUuid) -> VariantRecord {
    VariantRecord {
        uuid,
        product_uuid,
        name: "Party tent 6x3".to_string(),
        attributes: [("size".to_string(), "6x3".to_string())].into_iter().collect(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_unit(uuid: UnitUuid, variant_uuid: VariantUuid) -> UnitRecord {
    UnitRecord {
        uuid,
        variant_uuid,
        code: "PB-001".to_string(),
        status: UnitStatus::Rentable,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_price(
    variant_uuid: VariantUuid,
    period: PricePeriod,
    amount: u64,
) -> PriceRecord {
    PriceRecord {
        uuid: PriceUuid::new(),
        variant_uuid,
        period,
        amount,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(uuid: CartUuid) -> CartRecord {
    CartRecord {
        uuid,
        total: 0,
        items: vec![],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_cart_item(
    uuid: CartItemUuid,
    variant_uuid: VariantUuid,
    price: u64,
) -> CartItemRecord {
    CartItemRecord {
        uuid,
        variant_uuid,
        starts_at: Timestamp::UNIX_EPOCH,
        ends_at: Timestamp::UNIX_EPOCH + jiff::SignedDuration::from_hours(48),
        price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_booking(uuid: BookingUuid, status: BookingStatus) -> BookingRecord {
    BookingRecord {
        uuid,
        status,
        customer_name: Some("Ada Lovelace".to_string()),
        customer_email: Some("ada@example.com".to_string()),
        total: 0,
        details: vec![],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_detail(
    uuid: BookingDetailUuid,
    booking_uuid: BookingUuid,
    fulfillment: FulfillmentStatus,
) -> BookingDetailRecord {
    BookingDetailRecord {
        uuid,
        booking_uuid,
        variant_uuid: VariantUuid::new(),
        unit_uuid: Some(UnitUuid::new()),
        starts_at: Timestamp::UNIX_EPOCH,
        ends_at: Timestamp::UNIX_EPOCH + jiff::SignedDuration::from_hours(48),
        price: 20_00,
        fulfillment,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_agenda_item(
    detail_uuid: BookingDetailUuid,
    booking_uuid: BookingUuid,
    fulfillment: FulfillmentStatus,
) -> AgendaItemRecord {
    AgendaItemRecord {
        detail_uuid,
        booking_uuid,
        product_name: "Party tent".to_string(),
        variant_name: "Party tent 6x3".to_string(),
        unit_code: "PB-001".to_string(),
        customer_name: Some("Ada Lovelace".to_string()),
        starts_at: Timestamp::UNIX_EPOCH,
        ends_at: Timestamp::UNIX_EPOCH + jiff::SignedDuration::from_hours(48),
        fulfillment,
    }
}
