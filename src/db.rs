use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};
use tokio::sync::OnceCell;

use crate::error::ApiError;
use crate::schemas::Trip;

static CLIENT: OnceCell<Client> = OnceCell::const_new();

/// Returns the process-wide client, connecting on first use.
///
/// Concurrent first callers share a single connection attempt; a failed
/// attempt leaves the cell empty so the next call retries.
pub async fn connect(uri: &str) -> Result<&'static Client, mongodb::error::Error> {
    CLIENT
        .get_or_try_init(|| async {
            let client = Client::with_uri_str(uri).await?;
            tracing::info!("MongoDB connected");
            Ok(client)
        })
        .await
}

#[derive(Clone)]
pub struct TripStore {
    trips: Collection<Trip>,
}

impl TripStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            trips: client.database(database).collection("Trips"),
        }
    }

    pub async fn insert(&self, trip: &Trip) -> Result<(), ApiError> {
        self.trips.insert_one(trip, None).await?;
        tracing::info!(trip = %trip.id, "trip created");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Trip>, ApiError> {
        let cursor = self.trips.find(None, None).await?;
        let trips: Vec<Trip> = cursor.try_collect().await?;
        Ok(trips)
    }

    pub async fn find(&self, id: &str) -> Result<Trip, ApiError> {
        self.trips
            .find_one(doc! { "id": id }, None)
            .await?
            .ok_or_else(ApiError::trip_not_found)
    }

    /// Writes back a trip previously returned by [`TripStore::find`].
    pub async fn replace(&self, trip: &Trip) -> Result<(), ApiError> {
        let result = self
            .trips
            .replace_one(doc! { "id": trip.id.as_str() }, trip, None)
            .await?;
        if result.matched_count == 0 {
            return Err(ApiError::trip_not_found());
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let result = self.trips.delete_one(doc! { "id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(ApiError::trip_not_found());
        }
        tracing::info!(trip = %id, "trip deleted");
        Ok(())
    }
}
