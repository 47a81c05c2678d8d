//! # Med Reminder Backend
//!
//! Backend for the family medication reminder application. A head of
//! family registers dependents and their prescription schedules; triggering
//! a reminder produces an escalating sequence of call-flow events and
//! delegates the actual voice call to an external service.
//!
//! The backend follows a layered architecture:
//! ```text
//! Dashboard (external)
//!     |
//! IO Layer (REST API, handlers)
//!     |
//! Domain Layer (services, normalizers)
//!     |
//! Storage Layer (JSON document store, session registry)
//! ```

pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{
    AuthService, CallGateway, LogService, MedicationService, MemberService, ReminderService,
};
use crate::storage::{JsonStore, SessionRegistry};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub member_service: MemberService,
    pub medication_service: MedicationService,
    pub log_service: LogService,
    pub reminder_service: ReminderService,
}

/// Initialize the backend with all required services
pub fn initialize_backend() -> Result<AppState> {
    let data_file = std::env::var("MEDMINDER_DATA_FILE")
        .unwrap_or_else(|_| "data/medminder.json".to_string());
    info!("Setting up state store at {}", data_file);
    let store = Arc::new(JsonStore::open(&data_file)?);
    let sessions = Arc::new(SessionRegistry::new());
    let gateway = Arc::new(CallGateway::from_env()?);

    info!("Setting up domain services");
    Ok(AppState {
        auth_service: AuthService::new(Arc::clone(&store), Arc::clone(&sessions)),
        member_service: MemberService::new(Arc::clone(&store)),
        medication_service: MedicationService::new(Arc::clone(&store)),
        log_service: LogService::new(Arc::clone(&store)),
        reminder_service: ReminderService::new(store, gateway),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the dashboard to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/register", post(io::auth_apis::register))
        .route("/auth/login", post(io::auth_apis::login))
        .route("/auth/logout", post(io::auth_apis::logout))
        .route("/me", get(io::auth_apis::me))
        .route(
            "/members",
            get(io::member_apis::list_members).post(io::member_apis::create_member),
        )
        .route("/members/:member_id", put(io::member_apis::update_member))
        .route(
            "/members/:member_id/medications/:med_id/consume",
            post(io::medication_apis::consume),
        )
        .route(
            "/logs",
            get(io::log_apis::list_logs).post(io::log_apis::create_log),
        )
        .route("/reminders/trigger", post(io::reminder_apis::trigger_reminder))
        .route("/health", get(io::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
