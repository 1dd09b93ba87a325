use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::cache::ReadCachePolicy;
use crate::api::rest::identity::{HeaderIdentity, IdentityProvider};
use crate::api::rest::routes::{self, ArticlesApiDoc};
use crate::config::ArticlesConfig;
use crate::contract::client::ArticlesApi;
use crate::contract::model::UserId;
use crate::domain::ports::{AccessPolicy, CacheInvalidator};
use crate::domain::repo::ContentRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ArticlesLocalClient;
use crate::infra::access::{AllowAll, DenyAnonymousWrites};

/// Everything the REST surface needs once the module is initialized.
struct Wiring {
    service: Arc<Service>,
    identity: Arc<dyn IdentityProvider>,
    read_cache: ReadCachePolicy,
}

/// Articles module: owns the domain service and mounts its REST routes.
#[derive(Default)]
pub struct Articles {
    // Set once by `init`, read by every accessor.
    wiring: arc_swap::ArcSwapOption<Wiring>,
}

impl Articles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire storage and cache adapters into the domain service according to `cfg`.
    pub fn init(
        &self,
        cfg: &ArticlesConfig,
        repo: Arc<dyn ContentRepository>,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> anyhow::Result<()> {
        info!("Initializing articles module");
        debug!(
            "Loaded articles config: identity_header={}, allow_anonymous_writes={}, cache_max_age_secs={}",
            cfg.identity_header, cfg.allow_anonymous_writes, cfg.cache_max_age_secs
        );

        let anonymous = UserId(cfg.anonymous_user_id);
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(HeaderIdentity::new(&cfg.identity_header, anonymous)?);
        let access: Arc<dyn AccessPolicy> = if cfg.allow_anonymous_writes {
            Arc::new(AllowAll)
        } else {
            Arc::new(DenyAnonymousWrites::new(anonymous))
        };

        let service = Service::new(repo, access, invalidator, ServiceConfig::default());
        self.wiring.store(Some(Arc::new(Wiring {
            service: Arc::new(service),
            identity,
            read_cache: ReadCachePolicy {
                max_age_secs: cfg.cache_max_age_secs,
            },
        })));
        Ok(())
    }

    /// Create or upgrade the `node` and `paragraph` tables.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running articles database migrations");
        crate::infra::storage::migrations::Migrator::up(db, None).await?;
        info!("Articles database migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        let wiring = self.wiring()?;
        Ok(wiring.service.clone())
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn ArticlesApi>> {
        Ok(Arc::new(ArticlesLocalClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: Router) -> anyhow::Result<Router> {
        info!("Registering articles REST routes");
        let wiring = self.wiring()?;
        let router = routes::register_routes(
            router,
            wiring.service.clone(),
            wiring.identity.clone(),
            wiring.read_cache,
        );
        info!("Articles REST routes registered successfully");
        Ok(router)
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        ArticlesApiDoc::openapi()
    }

    fn wiring(&self) -> anyhow::Result<Arc<Wiring>> {
        self.wiring
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Articles module not initialized"))
    }
}
