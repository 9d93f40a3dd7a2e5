use serde::{Deserialize, Serialize};

/// Dense index of a city in the catalog.
///
/// Assigned once at catalog build time and stable for the process lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(pub u32);

impl CityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Value passed across the native boundary, which takes C `int`s.
    pub fn as_native(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
