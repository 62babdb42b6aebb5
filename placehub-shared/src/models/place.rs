/// Place model and database operations
///
/// A place is a user-submitted location: a title, a free-text address, and
/// the coordinates that address resolved to. Creation and deletion are
/// two-write operations, the place row and the creator's `place_ids` list
/// change together inside one transaction so a reader can never observe a
/// place without the matching entry in its creator's list (or vice versa).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE places (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     address VARCHAR(512) NOT NULL,
///     lat DOUBLE PRECISION NOT NULL,
///     lng DOUBLE PRECISION NOT NULL,
///     image_url VARCHAR(512) NOT NULL,
///     creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use placehub_shared::models::place::{CreatePlace, Place};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, creator_id: Uuid) -> Result<(), sqlx::Error> {
/// let place = Place::create_with_owner(
///     &pool,
///     CreatePlace {
///         title: "Empire State Building".to_string(),
///         description: "One of the most famous skyscrapers in the world".to_string(),
///         address: "20 W 34th St, New York, NY 10001".to_string(),
///         lat: 40.7484474,
///         lng: -73.9871516,
///         image_url: "uploads/images/esb.jpg".to_string(),
///         creator_id,
///     },
/// )
/// .await?;
///
/// assert_eq!(place.creator_id, creator_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Place model representing a user-submitted location
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Place {
    /// Unique place ID (UUID v4)
    pub id: Uuid,

    /// Short title shown in listings
    pub title: String,

    /// Longer free-text description
    pub description: String,

    /// The address the user entered
    pub address: String,

    /// Geocoded latitude
    pub lat: f64,

    /// Geocoded longitude
    pub lng: f64,

    /// Stored path of the place image
    pub image_url: String,

    /// The user who created this place
    pub creator_id: Uuid,

    /// When the place was created
    pub created_at: DateTime<Utc>,

    /// When the place was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new place
///
/// The address has already been geocoded by the caller; `lat`/`lng` carry
/// the result.
#[derive(Debug, Clone)]
pub struct CreatePlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub image_url: String,
    pub creator_id: Uuid,
}

/// Input for updating an existing place
///
/// Only the title and description are mutable after creation.
#[derive(Debug, Clone)]
pub struct UpdatePlace {
    pub title: String,
    pub description: String,
}

const PLACE_COLUMNS: &str =
    "id, title, description, address, lat, lng, image_url, creator_id, created_at, updated_at";

impl Place {
    /// Creates a place and appends its id to the creator's place list
    ///
    /// Both writes happen inside one transaction: the insert into `places`
    /// and the `array_append` onto `users.place_ids` commit or abort as a
    /// unit. If the creator row vanished between the caller's existence
    /// check and this call, the transaction aborts with `RowNotFound` and
    /// no place is created.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails or the transaction cannot be
    /// committed; the database is left in its pre-transaction state.
    pub async fn create_with_owner(pool: &PgPool, data: CreatePlace) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let place = sqlx::query_as::<_, Place>(&format!(
            r#"
            INSERT INTO places (title, description, address, lat, lng, image_url, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PLACE_COLUMNS}
            "#,
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.address)
        .bind(data.lat)
        .bind(data.lng)
        .bind(data.image_url)
        .bind(data.creator_id)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE users
            SET place_ids = array_append(place_ids, $1), updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(place.id)
        .bind(place.creator_id)
        .execute(&mut *tx)
        .await?;

        // Dropping the transaction without committing rolls the insert back.
        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await?;

        Ok(place)
    }

    /// Finds a place by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(place)
    }

    /// Lists all places owned by a user, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn list_by_creator(pool: &PgPool, creator_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE creator_id = $1 ORDER BY created_at",
        ))
        .bind(creator_id)
        .fetch_all(pool)
        .await?;

        Ok(places)
    }

    /// Updates a place's title and description
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    ///
    /// Returns `None` if no place exists with the given id.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePlace,
    ) -> Result<Option<Self>, sqlx::Error> {
        let place = sqlx::query_as::<_, Place>(&format!(
            r#"
            UPDATE places
            SET title = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PLACE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(place)
    }

    /// Deletes a place and removes its id from the creator's place list
    ///
    /// The delete and the `array_remove` commit or abort as a unit, like
    /// `create_with_owner`. Returns the deleted place so the caller can
    /// clean up the stored image after the transaction has committed.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails or the transaction cannot be
    /// committed; the database is left in its pre-transaction state.
    ///
    /// Returns `None` if no place exists with the given id.
    pub async fn delete_with_owner(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let place = sqlx::query_as::<_, Place>(&format!(
            "DELETE FROM places WHERE id = $1 RETURNING {PLACE_COLUMNS}",
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let place = match place {
            Some(place) => place,
            None => return Ok(None),
        };

        sqlx::query(
            r#"
            UPDATE users
            SET place_ids = array_remove(place_ids, $1), updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(place.id)
        .bind(place.creator_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(place))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_serialization() {
        let place = Place {
            id: Uuid::new_v4(),
            title: "Empire State Building".to_string(),
            description: "A famous skyscraper".to_string(),
            address: "20 W 34th St, New York, NY 10001".to_string(),
            lat: 40.7484474,
            lng: -73.9871516,
            image_url: "uploads/images/esb.jpg".to_string(),
            creator_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["title"], "Empire State Building");
        assert_eq!(json["lat"], 40.7484474);
        assert_eq!(json["lng"], -73.9871516);
        assert_eq!(json["creator_id"], place.creator_id.to_string());
    }

    #[test]
    fn test_update_place_struct() {
        let update = UpdatePlace {
            title: "New title".to_string(),
            description: "New description".to_string(),
        };

        assert_eq!(update.title, "New title");
        assert_eq!(update.description, "New description");
    }

    // The transactional create/delete paths are covered by the
    // database-backed tests in placehub-api/tests/
}
