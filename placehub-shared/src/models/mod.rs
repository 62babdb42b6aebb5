/// Database models for Placehub
///
/// This module contains the two entities of the system and their CRUD
/// operations.
///
/// # Models
///
/// - `user`: User accounts with hashed credentials and the list of owned places
/// - `place`: User-submitted locations with geocoded coordinates
///
/// # Example
///
/// ```no_run
/// use placehub_shared::models::user::{CreateUser, User};
/// use placehub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "Jane Doe".to_string(),
///         email: "jane@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         image_url: None,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod place;
pub mod user;
