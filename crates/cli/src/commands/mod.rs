//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod validate;

use secrecy::SecretString;

/// Database URL from `STOREFRONT_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// Loads `.env` first if present.
///
/// # Errors
///
/// Returns an error naming the variable if neither is set.
pub fn database_url() -> Result<SecretString, migrate::MigrationError> {
    dotenvy::dotenv().ok();

    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| migrate::MigrationError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}
