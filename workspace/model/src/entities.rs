//! SeaORM entity modules for the returns platform.
//! Only the account entity exists so far; returns and shipments will
//! reference it by `users.id`.

pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::user::Entity as User;
    pub use super::user::Role;
}
