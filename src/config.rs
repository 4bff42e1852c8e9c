// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, num::NonZeroU32, sync::Arc, time::Duration};

use crate::{
    db::{
        InMemoryStore, NoteRepository, NoteStore, TenantRepository, TenantStore, UserRepository,
        UserStore,
    },
    middleware::rate_limit::{RequestThrottle, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW},
    models::tenancy::QuotaPolicy,
    services::{AuthService, NoteService, PlanService, TokenService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl: chrono::Duration,
    pub port: u16,
    pub seed_demo_data: bool,
    pub rate_limit_requests: NonZeroU32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") | Err(_) => StoreBackend::Postgres,
            Ok(other) => anyhow::bail!("STORE_BACKEND inválido: {other}"),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL deve ser definida");
        }

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let jwt_ttl_secs: i64 = parse_or("JWT_EXPIRES_IN_SECS", 86_400)?;
        let port: u16 = parse_or("PORT", 3001)?;
        let database_max_connections: u32 = parse_or("DATABASE_MAX_CONNECTIONS", 5)?;
        let seed_demo_data: bool = parse_or("SEED_DEMO_DATA", false)?;

        let rate_limit_requests: u32 = parse_or("RATE_LIMIT_REQUESTS", DEFAULT_MAX_REQUESTS)?;
        let rate_limit_requests = NonZeroU32::new(rate_limit_requests)
            .context("RATE_LIMIT_REQUESTS deve ser maior que zero")?;
        let rate_limit_window_secs: u64 =
            parse_or("RATE_LIMIT_WINDOW_SECS", DEFAULT_WINDOW.as_secs())?;
        if rate_limit_window_secs == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECS deve ser maior que zero");
        }

        Ok(Self {
            store_backend,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl: chrono::Duration::seconds(jwt_ttl_secs),
            port,
            seed_demo_data,
            rate_limit_requests,
            rate_limit_window: Duration::from_secs(rate_limit_window_secs),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub users: Arc<dyn UserStore>,
    pub tenants: Arc<dyn TenantStore>,
    pub token_service: TokenService,
    pub auth_service: AuthService,
    pub plan_service: PlanService,
    pub note_service: NoteService,
    pub throttle: RequestThrottle,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let token_service = TokenService::new(&config.jwt_secret, config.jwt_ttl);
        let throttle = RequestThrottle::new(config.rate_limit_requests, config.rate_limit_window);

        match (config.store_backend, config.database_url.as_deref()) {
            (StoreBackend::Postgres, Some(database_url)) => {
                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.database_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                let mut state = Self::from_stores(
                    Arc::new(UserRepository::new(db_pool.clone())),
                    Arc::new(TenantRepository::new(db_pool.clone())),
                    Arc::new(NoteRepository::new(db_pool.clone())),
                    token_service,
                    QuotaPolicy::default(),
                );
                state.db_pool = Some(db_pool);
                Ok(state.with_throttle(throttle))
            }
            (StoreBackend::Postgres, None) => anyhow::bail!("DATABASE_URL deve ser definida"),
            (StoreBackend::Memory, _) => {
                tracing::warn!("⚠️ Usando store em memória: os dados somem ao reiniciar");
                let store = Arc::new(InMemoryStore::new());
                Ok(Self::from_stores(
                    store.clone(),
                    store.clone(),
                    store,
                    token_service,
                    QuotaPolicy::default(),
                )
                .with_throttle(throttle))
            }
        }
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_stores(
        users: Arc<dyn UserStore>,
        tenants: Arc<dyn TenantStore>,
        notes: Arc<dyn NoteStore>,
        token_service: TokenService,
        policy: QuotaPolicy,
    ) -> Self {
        let auth_service = AuthService::new(users.clone(), tenants.clone(), token_service.clone());
        let plan_service = PlanService::new(tenants.clone(), notes.clone(), policy);
        let note_service = NoteService::new(notes);

        Self {
            db_pool: None,
            users,
            tenants,
            token_service,
            auth_service,
            plan_service,
            note_service,
            throttle: RequestThrottle::default(),
        }
    }

    pub fn with_throttle(mut self, throttle: RequestThrottle) -> Self {
        self.throttle = throttle;
        self
    }
}
