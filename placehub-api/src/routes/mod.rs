/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `places`: Place CRUD with geocoding and image upload
/// - `users`: Listing, signup, and login

pub mod health;
pub mod places;
pub mod users;
