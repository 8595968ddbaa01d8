//! Explicit per-request tenant context.

use uuid::Uuid;

use crate::config::{PayrollConfig, SoftwareCredentials};
use crate::error::{EngineError, EngineResult};
use crate::models::EmployerProfile;
use crate::store::{ConfigStore, TenantReader};

/// The resolved tenant a command runs for.
///
/// Passed explicitly into every orchestrator call; nothing in the core
/// looks the tenant up from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// The tenant identifier.
    pub tenant_id: Uuid,
    /// The tenant's tax-authority profile, if configured.
    pub authority: Option<EmployerProfile>,
}

impl TenantContext {
    /// A context without an authority profile.
    pub fn new(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            authority: None,
        }
    }

    /// Attaches an authority profile.
    pub fn with_authority(mut self, authority: EmployerProfile) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Resolves the context for a tenant through the tenant directory.
    pub async fn resolve(tenants: &dyn TenantReader, tenant_id: Uuid) -> EngineResult<Self> {
        if !tenants.tenant_exists(tenant_id).await? {
            return Err(EngineError::not_found("Tenant", tenant_id));
        }
        let authority = tenants.authority_profile(tenant_id).await?;
        Ok(Self {
            tenant_id,
            authority,
        })
    }

    /// The authority profile, required for document generation.
    pub fn require_authority(&self) -> EngineResult<&EmployerProfile> {
        match &self.authority {
            Some(profile) if profile.is_complete() => Ok(profile),
            Some(_) => Err(EngineError::bad_request(
                "Tax-authority configuration is incomplete for this tenant",
            )),
            None => Err(EngineError::bad_request(
                "Tax-authority configuration is missing for this tenant",
            )),
        }
    }

    /// Loads the tenant's active payroll configuration.
    pub async fn require_config(&self, configs: &dyn ConfigStore) -> EngineResult<PayrollConfig> {
        configs
            .active_config(self.tenant_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payroll configuration", self.tenant_id))
    }
}

/// The registered software credentials, required for document generation.
pub fn require_software(config: &PayrollConfig) -> EngineResult<&SoftwareCredentials> {
    config.software.as_ref().ok_or_else(|| {
        EngineError::bad_request("Payroll software credentials are not configured for this tenant")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryStore;
    use crate::test_support::{sample_config, sample_employer};

    #[tokio::test]
    async fn test_resolve_unknown_tenant_is_not_found() {
        let store = MemoryStore::new();
        let err = TenantContext::resolve(&store, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_loads_authority() {
        let store = MemoryStore::new();
        let tenant = Uuid::new_v4();
        store.register_tenant(tenant, Some(sample_employer())).await;
        let ctx = TenantContext::resolve(&store, tenant).await.unwrap();
        assert_eq!(ctx.require_authority().unwrap().nit, "900123456");
    }

    #[test]
    fn test_missing_or_incomplete_authority_is_bad_request() {
        let ctx = TenantContext::new(Uuid::new_v4());
        assert_eq!(ctx.require_authority().unwrap_err().kind(), ErrorKind::BadRequest);

        let mut profile = sample_employer();
        profile.nit.clear();
        let ctx = ctx.with_authority(profile);
        assert_eq!(ctx.require_authority().unwrap_err().kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_require_config() {
        let store = MemoryStore::new();
        let ctx = TenantContext::new(Uuid::new_v4());
        assert_eq!(
            ctx.require_config(&store).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        store.save_config(ctx.tenant_id, sample_config()).await.unwrap();
        assert!(ctx.require_config(&store).await.is_ok());
    }

    #[test]
    fn test_require_software() {
        let mut config = sample_config();
        assert!(require_software(&config).is_ok());
        config.software = None;
        assert_eq!(require_software(&config).unwrap_err().kind(), ErrorKind::BadRequest);
    }
}
