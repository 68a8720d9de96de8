//! # Kennel Backend
//!
//! HTTP backend for a pug kennel: litters and their puppies, the breeding
//! stock ("grumble"), and the public puppy waitlist.
//!
//! ## Architecture
//!
//! - **domain**: business rules (classification, cascades, waitlist ranking)
//! - **storage**: SQLite repositories and the image blob store
//! - **io**: the REST layer (routers, DTO mappers, error translation)
//!
//! [`initialize_backend`] wires the layers together from a [`KennelConfig`];
//! [`create_router`] turns the resulting [`AppState`] into an axum app.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

pub use config::KennelConfig;

use domain::{
    BusinessClock, GrumbleService, ImageLifecycle, LitterService, PuppyService, SettingsService,
    WaitlistService,
};
use io::rest::auth::{Authorizer, TokenAuthorizer};
use storage::{
    DbConnection, FsImageStore, GrumbleRepository, ImageReleaseRepository, ImageStore,
    LitterRepository, PuppyRepository, SettingsRepository, WaitlistRepository,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub litter_service: LitterService,
    pub puppy_service: PuppyService,
    pub grumble_service: GrumbleService,
    pub waitlist_service: WaitlistService,
    pub settings_service: SettingsService,
    pub authorizer: Arc<dyn Authorizer>,
}

/// Wire repositories and services over one database connection
pub fn build_state(
    db: DbConnection,
    image_store: Arc<dyn ImageStore>,
    authorizer: Arc<dyn Authorizer>,
    config: &KennelConfig,
    clock: BusinessClock,
) -> AppState {
    let litters = Arc::new(LitterRepository::new(db.clone()));
    let members = Arc::new(GrumbleRepository::new(db.clone()));
    let images = ImageLifecycle::new(Arc::new(ImageReleaseRepository::new(db.clone())), image_store);
    let settings_service = SettingsService::new(Arc::new(SettingsRepository::new(db.clone())));

    AppState {
        litter_service: LitterService::new(litters.clone(), members.clone(), images.clone(), clock),
        puppy_service: PuppyService::new(
            litters,
            Arc::new(PuppyRepository::new(db.clone())),
            images.clone(),
        ),
        grumble_service: GrumbleService::new(members, images, config.parent_delete_policy),
        waitlist_service: WaitlistService::new(
            Arc::new(WaitlistRepository::new(db)),
            settings_service.clone(),
        ),
        settings_service,
        authorizer,
    }
}

/// Open the database, prepare the uploads directory and retry any image
/// releases left over from a previous run.
pub async fn initialize_backend(config: &KennelConfig) -> Result<AppState> {
    info!("Initializing backend with database {}", config.database_url);

    std::fs::create_dir_all(&config.uploads_dir).with_context(|| {
        format!("Failed to create uploads directory {}", config.uploads_dir.display())
    })?;

    let db = DbConnection::new(&config.database_url).await?;
    let image_store: Arc<dyn ImageStore> = Arc::new(FsImageStore::new(config.uploads_dir.clone()));
    let authorizer: Arc<dyn Authorizer> = Arc::new(TokenAuthorizer::new(config.admin_token.clone()));
    let clock = BusinessClock::new(config.business_offset()?);

    let state = build_state(db.clone(), image_store.clone(), authorizer, config, clock);

    let drain = ImageLifecycle::new(Arc::new(ImageReleaseRepository::new(db)), image_store);
    match drain.drain_pending().await {
        Ok(0) => {}
        Ok(released) => info!("Released {} images left pending by a previous run", released),
        Err(e) => warn!("Could not drain pending image releases: {}", e),
    }

    Ok(state)
}

/// Build the HTTP application
pub fn create_router(state: AppState, config: &KennelConfig) -> Result<Router> {
    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(api_router(state)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

fn api_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/litters", io::rest::litter_apis::router().merge(io::rest::puppy_apis::router()))
        .nest("/grumble", io::rest::grumble_apis::router())
        .nest("/waitlist", io::rest::waitlist_apis::router())
        .nest("/settings", io::rest::settings_apis::router());

    Router::new().nest("/api", api_routes).with_state(state)
}
