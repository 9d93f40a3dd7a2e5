use foundation::ids::CityId;
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    /// Cartesian position on (or near) the globe surface.
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    UnknownCity(CityId),
    Empty,
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::UnknownCity(id) => write!(f, "city {id} is not in the catalog"),
            CatalogError::Empty => write!(f, "native engine returned an empty catalog"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only, index-addressable set of cities.
///
/// Built once from the decoded native catalog. Ids are dense: city `i` sits at
/// index `i`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    pub fn from_positions(positions: Vec<Vec3>) -> Result<Self, CatalogError> {
        if positions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let cities = positions
            .into_iter()
            .zip(0u32..)
            .map(|(position, idx)| City {
                id: CityId(idx),
                position,
            })
            .collect();
        Ok(Self { cities })
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn contains(&self, id: CityId) -> bool {
        id.index() < self.cities.len()
    }

    pub fn get(&self, id: CityId) -> Option<&City> {
        self.cities.get(id.index())
    }

    pub fn position(&self, id: CityId) -> Result<Vec3, CatalogError> {
        self.get(id)
            .map(|c| c.position)
            .ok_or(CatalogError::UnknownCity(id))
    }

    /// Resolves every id in order, failing on the first unknown one.
    pub fn positions(&self, ids: &[CityId]) -> Result<Vec<Vec3>, CatalogError> {
        ids.iter().map(|&id| self.position(id)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> + '_ {
        self.cities.iter()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// `[{ "id": 0, "position": { "x": .., "y": .., "z": .. } }, ..]`
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.cities).unwrap_or_else(|_| "[]".to_string())
    }
}
