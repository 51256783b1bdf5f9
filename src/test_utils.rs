#[cfg(test)]
pub mod test_utils {
    use crate::config::HttpConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use accounts::SignupForm;
    use axum::Router;
    use axum::http::HeaderValue;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const ADMIN_USERNAME: &str = "admin";
    pub const ADMIN_PASSWORD: &str = "Central-Logistica-2025";
    pub const CLIENT_USERNAME: &str = "cliente1";
    pub const CLIENT_PASSWORD: &str = "Caja-Devuelta-88";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing with one superuser and one client account
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        accounts::auth::create_superuser(&db, ADMIN_USERNAME, "admin@devoluciones.uy", ADMIN_PASSWORD)
            .await
            .expect("Failed to create test superuser");

        SignupForm {
            username: CLIENT_USERNAME.to_string(),
            email: "cliente1@devoluciones.uy".to_string(),
            password1: CLIENT_PASSWORD.to_string(),
            password2: CLIENT_PASSWORD.to_string(),
            tipo: "cliente".to_string(),
            direccion: Some("18 de Julio 1234".to_string()),
        }
        .save(&db)
        .await
        .expect("Failed to create test client");

        AppState { db }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG, defaulting to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state, &HttpConfig::default())
    }

    /// `Authorization` value for HTTP Basic credentials
    pub fn basic_auth(username: &str, password: &str) -> HeaderValue {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        HeaderValue::from_str(&format!("Basic {}", encoded)).expect("Invalid header value")
    }

    pub fn admin_auth() -> HeaderValue {
        basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD)
    }
}
