use crate::error::Result;
use async_trait::async_trait;

/// Supplies the raw vector markup of a venue's seating layout.
#[async_trait]
pub trait LayoutProvider: Send + Sync {
    /// Fetches the layout markup for a venue.
    ///
    /// # Arguments
    ///
    /// * `venue_id` - The ID of the venue whose layout is requested
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: SVG markup (possibly empty)
    /// - `Err(SeatmapError::NotFound)`: Unknown venue
    /// - `Err(_)`: Error occurred during retrieval
    async fn fetch_layout(&self, venue_id: &str) -> Result<String>;
}
