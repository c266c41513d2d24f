use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tokio::sync::broadcast;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::blocks::BlockService;
use crate::sync::CHANGE_CHANNEL_CAPACITY;
use crate::infra::repositories::{
    postgres_shop_repo::PostgresShopRepo, postgres_user_repo::PostgresUserRepo,
    postgres_service_repo::PostgresServiceRepo, postgres_barber_repo::PostgresBarberRepo,
    postgres_block_repo::PostgresBlockRepo, postgres_appointment_repo::PostgresAppointmentRepo,
    sqlite_shop_repo::SqliteShopRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_service_repo::SqliteServiceRepo, sqlite_barber_repo::SqliteBarberRepo,
    sqlite_block_repo::SqliteBlockRepo, sqlite_appointment_repo::SqliteAppointmentRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_state(config, pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_state(config, pool)
    }
}

pub fn postgres_state(config: &Config, pool: PgPool) -> AppState {
    let barber_repo = Arc::new(PostgresBarberRepo::new(pool.clone()));
    let block_repo = Arc::new(PostgresBlockRepo::new(pool.clone()));
    let appointment_repo = Arc::new(PostgresAppointmentRepo::new(pool.clone()));
    let block_service = Arc::new(BlockService::new(barber_repo.clone(), block_repo.clone(), appointment_repo.clone()));
    let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

    AppState {
        config: config.clone(),
        shop_repo: Arc::new(PostgresShopRepo::new(pool.clone())),
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        service_repo: Arc::new(PostgresServiceRepo::new(pool.clone())),
        barber_repo,
        block_repo,
        appointment_repo,
        block_service,
        changes,
    }
}

pub fn sqlite_state(config: &Config, pool: SqlitePool) -> AppState {
    let barber_repo = Arc::new(SqliteBarberRepo::new(pool.clone()));
    let block_repo = Arc::new(SqliteBlockRepo::new(pool.clone()));
    let appointment_repo = Arc::new(SqliteAppointmentRepo::new(pool.clone()));
    let block_service = Arc::new(BlockService::new(barber_repo.clone(), block_repo.clone(), appointment_repo.clone()));
    let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

    AppState {
        config: config.clone(),
        shop_repo: Arc::new(SqliteShopRepo::new(pool.clone())),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        service_repo: Arc::new(SqliteServiceRepo::new(pool.clone())),
        barber_repo,
        block_repo,
        appointment_repo,
        block_service,
        changes,
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
