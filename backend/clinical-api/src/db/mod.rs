use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod appointment_repo;
pub mod doctor_repo;
pub mod image_repo;
pub mod patient_repo;
pub mod report_repo;
pub mod study_repo;
pub mod user_repo;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
