use migration::{Migrator, MigratorTrait};
use model::entities::user::{self, Role};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::password::hash_password;

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Insert an account directly, bypassing form validation.
pub async fn insert_account(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: Role,
) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(hash_password(password).expect("Failed to hash password")),
        email: Set(format!("{}@example.com", username)),
        role: Set(role),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert account")
}
