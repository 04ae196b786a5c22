//! Exact nearest-neighbour search over a fixed set of embedding vectors.
//!
//! The on-disk format is a JSON document:
//!
//! ```json
//! { "dimension": 1024, "metric": "l2", "vectors": [[0.1, ...], ...] }
//! ```
//!
//! Vector id `i` is the position of the vector in `vectors`.

use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::error::{IndexUnavailable, RetrievalError};

/// Id reported for result slots that have no matching vector.
pub const SENTINEL_ID: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: i64,
    /// Lower is closer.
    pub distance: f32,
}

impl Neighbor {
    pub fn sentinel() -> Self {
        Self {
            id: SENTINEL_ID,
            distance: f32::INFINITY,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id < 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared Euclidean distance.
    #[default]
    L2,
    /// `1 - cosine similarity`.
    Cosine,
}

pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns exactly `k` entries ordered by ascending distance. Slots beyond
    /// the number of stored vectors hold [`Neighbor::sentinel`].
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError>;
}

#[derive(Deserialize)]
struct IndexFile {
    dimension: usize,
    #[serde(default)]
    metric: DistanceMetric,
    vectors: Vec<Vec<f32>>,
}

/// Brute-force index holding every vector in one row-major matrix.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    metric: DistanceMetric,
    vectors: Array2<f32>,
    /// Squared L2 norm of each row.
    norms: Array1<f32>,
}

impl FlatIndex {
    pub fn new(
        dimension: usize,
        metric: DistanceMetric,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, IndexUnavailable> {
        if dimension == 0 {
            return Err(IndexUnavailable::Malformed(
                "dimension must be greater than zero".to_string(),
            ));
        }

        let rows = vectors.len();
        let mut flat = Vec::with_capacity(rows * dimension);
        for (id, vector) in vectors.into_iter().enumerate() {
            if vector.len() != dimension {
                return Err(IndexUnavailable::Malformed(format!(
                    "vector {} has dimension {}, expected {}",
                    id,
                    vector.len(),
                    dimension
                )));
            }
            flat.extend(vector);
        }

        let vectors = Array2::from_shape_vec((rows, dimension), flat)
            .map_err(|e| IndexUnavailable::Malformed(e.to_string()))?;
        let norms = vectors.map_axis(Axis(1), |row| row.dot(&row));

        Ok(Self {
            metric,
            vectors,
            norms,
        })
    }

    pub fn load(path: &Path) -> Result<Self, IndexUnavailable> {
        if !path.exists() {
            return Err(IndexUnavailable::MissingArtifact(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|source| IndexUnavailable::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: IndexFile =
            serde_json::from_str(&contents).map_err(|source| IndexUnavailable::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(file.dimension, file.metric, file.vectors)
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn distances(&self, query: ArrayView1<'_, f32>) -> Array1<f32> {
        let dots = self.vectors.dot(&query);
        let query_norm = query.dot(&query);

        match self.metric {
            DistanceMetric::L2 => {
                let mut out = &self.norms - &(dots * 2.0);
                out.mapv_inplace(|d| (d + query_norm).max(0.0));
                out
            }
            DistanceMetric::Cosine => {
                let query_len = query_norm.sqrt();
                let mut out = dots;
                for (d, norm) in out.iter_mut().zip(self.norms.iter()) {
                    let denom = norm.sqrt() * query_len;
                    *d = if denom <= f32::EPSILON {
                        1.0
                    } else {
                        1.0 - *d / denom
                    };
                }
                out
            }
        }
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    fn len(&self) -> usize {
        self.vectors.nrows()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, RetrievalError> {
        if query.len() != self.dimension() {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension(),
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let distances = self.distances(ArrayView1::from(query));
        let mut scored: Vec<(usize, f32)> = distances.iter().copied().enumerate().collect();

        let by_distance =
            |a: &(usize, f32), b: &(usize, f32)| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0));
        if scored.len() > k {
            scored.select_nth_unstable_by(k - 1, by_distance);
            scored.truncate(k);
        }
        scored.sort_by(by_distance);

        let mut neighbors: Vec<Neighbor> = scored
            .into_iter()
            .map(|(id, distance)| Neighbor {
                id: id as i64,
                distance,
            })
            .collect();
        neighbors.resize(k, Neighbor::sentinel());
        Ok(neighbors)
    }
}
