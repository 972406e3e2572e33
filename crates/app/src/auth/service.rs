//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError,
        models::{ApiTokenMetadata, IssuedApiToken, NewApiToken},
        repository::PgAuthRepository,
        token::{generate_api_token, hash_api_token},
    },
    domain::tenants::records::TenantUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given tenant.
    ///
    /// The raw token is returned once; only its hash is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if database insertion fails.
    pub async fn issue_api_token(
        &self,
        tenant_uuid: TenantUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token = generate_api_token();

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: Uuid::now_v7(),
                tenant_uuid,
                token_hash: hash_api_token(&token),
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        tenant_uuid: TenantUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_tenant(tenant_uuid)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<TenantUuid, AuthServiceError> {
        self.repository
            .find_tenant_by_token_hash(&hash_api_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
/// Bearer token authentication.
pub trait AuthService: Send + Sync {
    /// Resolve a presented bearer token to the owning tenant.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<TenantUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_to_owning_tenant() {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let issued = svc
            .issue_api_token(ctx.tenant_uuid)
            .await
            .expect("issue_api_token should succeed");

        let tenant = svc
            .authenticate_bearer(&issued.token)
            .await
            .expect("authenticate_bearer should succeed");

        assert_eq!(tenant, ctx.tenant_uuid);
        assert_eq!(issued.metadata.tenant_uuid, ctx.tenant_uuid);
        assert!(issued.metadata.revoked_at.is_none());
    }

    #[tokio::test]
    async fn unknown_token_returns_not_found() {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let result = svc.authenticate_bearer("nl_deadbeef").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn revoked_token_no_longer_authenticates() {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let issued = svc
            .issue_api_token(ctx.tenant_uuid)
            .await
            .expect("issue_api_token should succeed");

        let was_active = svc
            .revoke_api_token(issued.metadata.uuid)
            .await
            .expect("revoke_api_token should succeed");

        assert!(was_active, "token should have been active before revocation");

        let result = svc.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound after revocation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn revoking_twice_reports_inactive() {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let issued = svc
            .issue_api_token(ctx.tenant_uuid)
            .await
            .expect("issue_api_token should succeed");

        svc.revoke_api_token(issued.metadata.uuid)
            .await
            .expect("first revoke should succeed");

        let was_active = svc
            .revoke_api_token(issued.metadata.uuid)
            .await
            .expect("second revoke should succeed");

        assert!(!was_active, "second revoke should report an inactive token");
    }

    #[tokio::test]
    async fn list_api_tokens_returns_issued_tokens() {
        let ctx = TestContext::new().await;
        let svc = PgAuthService::new(ctx.db.pool().clone());

        let a = svc
            .issue_api_token(ctx.tenant_uuid)
            .await
            .expect("issue_api_token should succeed");

        let b = svc
            .issue_api_token(ctx.tenant_uuid)
            .await
            .expect("issue_api_token should succeed");

        let tokens = svc
            .list_api_tokens(ctx.tenant_uuid)
            .await
            .expect("list_api_tokens should succeed");

        let uuids: Vec<_> = tokens.iter().map(|token| token.uuid).collect();

        assert!(uuids.contains(&a.metadata.uuid), "token A should be listed");
        assert!(uuids.contains(&b.metadata.uuid), "token B should be listed");
    }
}
