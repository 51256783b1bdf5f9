use accounts::AccountsError;
use anyhow::{Result, bail};
use sea_orm::Database;
use tracing::{error, info};

pub async fn create_superuser(
    database_url: &str,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let db = Database::connect(database_url).await?;

    match accounts::auth::create_superuser(&db, username, email, password).await {
        Ok(account) => {
            info!("Superuser '{}' created with id {}", account, account.id);
            Ok(())
        }
        Err(AccountsError::Validation(errors)) => {
            error!("Superuser not created: {}", errors);
            bail!("invalid superuser data: {}", errors)
        }
        Err(e) => Err(e.into()),
    }
}
