use serde::{Deserialize, Serialize};

/// Session time in whole milliseconds.
///
/// Supplied by the host event loop (`performance.now()` in the browser, a
/// simulated clock in the CLI) so scheduling stays deterministic and replayable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub fn saturating_add(self, ms: u64) -> Self {
        Millis(self.0.saturating_add(ms))
    }
}

impl std::ops::Add<u64> for Millis {
    type Output = Self;

    fn add(self, ms: u64) -> Self::Output {
        self.saturating_add(ms)
    }
}
