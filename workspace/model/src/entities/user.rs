use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, Set};

/// Maximum number of characters stored in `direccion`.
pub const ADDRESS_MAX_LENGTH: usize = 255;

/// Kind of account. Stored as the lowercase Spanish label in the `tipo` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "cliente")]
    Client,
    #[sea_orm(string_value = "transportista")]
    Carrier,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// The stored value, e.g. `"cliente"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "cliente",
            Role::Carrier => "transportista",
            Role::Admin => "admin",
        }
    }

    /// Human readable label shown on the admin surface.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Cliente",
            Role::Carrier => "Transportista",
            Role::Admin => "Administrador",
        }
    }

    /// Whether the role may be picked during self-registration.
    pub fn is_self_registrable(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cliente" => Ok(Role::Client),
            "transportista" => Ok(Role::Carrier),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown account type: {}", other)),
        }
    }
}

/// An authenticatable account of the returns platform.
/// Carries the usual identity fields plus the account type and a postal address.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string. Never exposed through the API.
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
    pub date_joined: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
    #[sea_orm(column_name = "tipo")]
    pub role: Role,
    #[sea_orm(column_name = "direccion")]
    pub address: Option<String>,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if self.role.is_not_set() {
                self.role = Set(Role::default());
            }
            if self.date_joined.is_not_set() {
                self.date_joined = Set(chrono::Utc::now());
            }
            for flag in [&mut self.is_staff, &mut self.is_superuser] {
                if flag.is_not_set() {
                    *flag = Set(false);
                }
            }
            if self.is_active.is_not_set() {
                self.is_active = Set(true);
            }
            for name in [&mut self.email, &mut self.first_name, &mut self.last_name] {
                if name.is_not_set() {
                    *name = Set(String::new());
                }
            }
            if self.address.is_not_set() {
                self.address = Set(None);
            }
            if self.last_login.is_not_set() {
                self.last_login = Set(None);
            }
        }

        if let ActiveValue::Set(Some(address)) | ActiveValue::Unchanged(Some(address)) =
            &self.address
        {
            let length = address.chars().count();
            if length > ADDRESS_MAX_LENGTH {
                tracing::warn!(length, "Rejecting account address above the column bound");
                return Err(DbErr::Custom(format!(
                    "direccion has {} characters, at most {} are allowed",
                    length, ADDRESS_MAX_LENGTH
                )));
            }
        }

        Ok(self)
    }
}
