use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A viewer and the titles they marked as favorites
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Favorited title ids in the order they were added
    pub favorites: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a new profile with no favorites
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            favorites: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_favorite(&self, item_id: u64) -> bool {
        self.favorites.contains(&item_id)
    }

    /// Adds the title if it isn't a favorite yet, removes it otherwise.
    ///
    /// Returns whether the title is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item_id: u64) -> bool {
        if self.is_favorite(item_id) {
            self.favorites.retain(|id| *id != item_id);
            false
        } else {
            self.favorites.push(item_id);
            true
        }
    }
}
