//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::domain::tenants::records::TenantUuid;

/// API token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub tenant_uuid: TenantUuid,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewApiToken {
    pub uuid: Uuid,
    pub tenant_uuid: TenantUuid,
    pub token_hash: String,
}

/// A freshly issued token together with its stored metadata.
///
/// The raw token is only available here; storage keeps the hash.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
