//! Clinical records REST backend.
//!
//! Patients, doctors, studies, images, reports, appointments, and
//! JWT-based authentication with role-based access control; one inference
//! endpoint delegates to an external image classifier.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod validators;

pub use error::{AppError, Result};

use auth_core::TokenService;
use services::mailer::Mailer;
use services::scoring::ScoringService;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: config::Config,
    pub tokens: TokenService,
    pub mailer: Mailer,
    pub scorer: ScoringService,
}

impl AppState {
    pub fn new(config: config::Config, db: sqlx::PgPool) -> Self {
        let tokens = TokenService::new(&config.secret_key);
        let mailer = Mailer::new(&config);
        let scorer = ScoringService::new(config.model_endpoint_url.clone());

        AppState {
            db,
            config,
            tokens,
            mailer,
            scorer,
        }
    }
}
