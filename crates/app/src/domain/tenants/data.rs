//! Tenants Data

use crate::domain::tenants::records::TenantUuid;

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    pub uuid: TenantUuid,
    pub name: String,
}
