pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_add_tipo_and_direccion;
mod m20250101_000003_username_case_insensitive_unique;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_add_tipo_and_direccion::Migration),
            Box::new(m20250101_000003_username_case_insensitive_unique::Migration),
        ]
    }
}
