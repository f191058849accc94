use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::rank::{rank_descending, round2};
use super::{BuildError, RecommendError};

/// Name reported for items missing from the item-name mapping.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown";

/// Raw rating value meaning "not rated".
const UNRATED: f64 = 0.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rank: usize,
    pub name: String,
    pub rating: f64,
}

/// User-based k-nearest-neighbors rating predictor.
///
/// Neighbors are searched in the normalized rating space; predictions average
/// the neighbors' raw ratings, ignoring unrated (zero) cells.
pub struct CollaborativePredictor {
    user_index: HashMap<String, usize>,
    items: Vec<String>,
    item_names: HashMap<String, String>,
    normalized: Array2<f64>,
    raw: Array2<f64>,
    neighbors: usize,
    top_n: usize,
}

impl CollaborativePredictor {
    pub fn new(
        users: Vec<String>,
        items: Vec<String>,
        item_names: HashMap<String, String>,
        normalized: Array2<f64>,
        raw: Array2<f64>,
        neighbors: usize,
        top_n: usize,
    ) -> Result<Self, BuildError> {
        if normalized.dim() != raw.dim() {
            return Err(BuildError::Shape(format!(
                "normalized matrix is {:?} but raw matrix is {:?}",
                normalized.dim(),
                raw.dim()
            )));
        }
        if raw.nrows() != users.len() {
            return Err(BuildError::Shape(format!(
                "rating matrices have {} rows for {} users",
                raw.nrows(),
                users.len()
            )));
        }
        if raw.ncols() != items.len() {
            return Err(BuildError::Shape(format!(
                "rating matrices have {} columns for {} items",
                raw.ncols(),
                items.len()
            )));
        }

        let mut user_index = HashMap::with_capacity(users.len());
        for (idx, user) in users.into_iter().enumerate() {
            if user_index.contains_key(&user) {
                return Err(BuildError::DuplicateUser(user));
            }
            user_index.insert(user, idx);
        }

        Ok(Self {
            user_index,
            items,
            item_names,
            normalized,
            raw,
            neighbors,
            top_n,
        })
    }

    pub fn user_count(&self) -> usize {
        self.user_index.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Top rated predictions among the items `user` has not rated yet.
    pub fn predict(&self, user: &str) -> Result<Vec<Recommendation>, RecommendError> {
        let target = *self
            .user_index
            .get(user)
            .ok_or_else(|| RecommendError::UserNotFound(user.to_string()))?;

        let neighbors = self.nearest_neighbors(target, self.neighbors);
        let predicted = self.predicted_ratings(&neighbors);

        let unrated: Vec<usize> = self
            .raw
            .row(target)
            .iter()
            .enumerate()
            .filter(|(_, &rating)| rating == UNRATED)
            .map(|(item, _)| item)
            .collect();
        let scores: Vec<f64> = unrated.iter().map(|&item| predicted[item]).collect();

        let recommendations: Vec<Recommendation> = rank_descending(&scores)
            .into_iter()
            .take(self.top_n)
            .enumerate()
            .map(|(pos, k)| {
                let item = unrated[k];
                Recommendation {
                    rank: pos + 1,
                    name: self.item_name(item).to_string(),
                    rating: round2(predicted[item]),
                }
            })
            .collect();

        debug!(
            user = user,
            neighbors = ?neighbors,
            unrated = unrated.len(),
            returned = recommendations.len(),
            "predicted ratings"
        );

        Ok(recommendations)
    }

    /// Rows closest to `row` by Euclidean distance in the normalized space,
    /// nearest first. `row` itself is a candidate like any other, and ties go
    /// to the lower row index.
    pub fn nearest_neighbors(&self, row: usize, k: usize) -> Vec<usize> {
        let target = self.normalized.row(row);
        let mut distances: Vec<(usize, f64)> = self
            .normalized
            .outer_iter()
            .enumerate()
            .map(|(idx, other)| (idx, euclidean(target, other)))
            .collect();

        distances.sort_by(|a, b| a.1.total_cmp(&b.1));
        distances.into_iter().take(k).map(|(idx, _)| idx).collect()
    }

    /// Mean of the non-zero neighbor ratings per item, 0 where no neighbor rated it.
    fn predicted_ratings(&self, neighbors: &[usize]) -> Array1<f64> {
        let mut predicted = Array1::zeros(self.raw.ncols());

        for (item, slot) in predicted.iter_mut().enumerate() {
            let (sum, count) = neighbors
                .iter()
                .map(|&n| self.raw[[n, item]])
                .filter(|&rating| rating != UNRATED)
                .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));

            if count > 0 {
                *slot = sum / count as f64;
            }
        }

        predicted
    }

    fn item_name(&self, item: usize) -> &str {
        self.item_names
            .get(&self.items[item])
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ITEM_NAME)
    }
}

fn euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
