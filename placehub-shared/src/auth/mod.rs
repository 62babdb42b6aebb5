/// Credential handling for Placehub
///
/// # Modules
///
/// - `password`: Argon2id password hashing and verification

pub mod password;
