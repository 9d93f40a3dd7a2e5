/// Epoch counter for cooperative cancellation of deferred work.
///
/// Every deferred task captures a [`GenerationToken`] when it is scheduled.
/// Bumping the generation supersedes all earlier tokens at once: their tasks
/// stay queued but must do nothing when they fire. The newest generation
/// always wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Generation {
    current: u64,
}

/// Generation value captured by a deferred task at scheduling time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationToken(u64);

impl GenerationToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.current
    }

    /// Supersedes every outstanding token and returns the new current one.
    pub fn advance(&mut self) -> GenerationToken {
        self.current = self.current.wrapping_add(1);
        GenerationToken(self.current)
    }

    pub fn token(&self) -> GenerationToken {
        GenerationToken(self.current)
    }

    pub fn is_current(&self, token: GenerationToken) -> bool {
        token.0 == self.current
    }
}

/// A payload tagged with the generation it was created under.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub token: GenerationToken,
    pub payload: T,
}

impl<T> Stamped<T> {
    pub fn new(token: GenerationToken, payload: T) -> Self {
        Self { token, payload }
    }

    /// Returns the payload if it is still current, `None` if superseded.
    pub fn into_current(self, generation: &Generation) -> Option<T> {
        generation.is_current(self.token).then_some(self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::{Generation, Stamped};

    #[test]
    fn starts_at_zero_and_advances() {
        let mut g = Generation::new();
        assert_eq!(g.value(), 0);
        let t1 = g.advance();
        assert_eq!(t1.value(), 1);
        assert!(g.is_current(t1));
    }

    #[test]
    fn advancing_supersedes_older_tokens() {
        let mut g = Generation::new();
        let t1 = g.advance();
        let t2 = g.advance();
        assert!(!g.is_current(t1));
        assert!(g.is_current(t2));
    }

    #[test]
    fn stamped_payload_is_dropped_once_superseded() {
        let mut g = Generation::new();
        let old = Stamped::new(g.advance(), "old");
        let new = Stamped::new(g.advance(), "new");
        assert_eq!(old.into_current(&g), None);
        assert_eq!(new.into_current(&g), Some("new"));
    }
}
