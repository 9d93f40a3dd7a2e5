use std::cell::RefCell;

use planner::SessionError;

/// Why an exported call could not run against the session slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotError {
    NotStarted,
    /// The slot is already borrowed, i.e. a renderer callback re-entered the module.
    Busy,
    Session(SessionError),
}

impl std::fmt::Display for SlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotError::NotStarted => write!(f, "no map session started"),
            SlotError::Busy => write!(f, "map session is busy"),
            SlotError::Session(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SlotError {}

impl From<SessionError> for SlotError {
    fn from(e: SessionError) -> Self {
        SlotError::Session(e)
    }
}

/// Runs `f` on the session in `slot`. Re-entrant calls get [`SlotError::Busy`]
/// instead of a borrow panic.
pub fn with_slot<S, T>(
    slot: &RefCell<Option<S>>,
    f: impl FnOnce(&mut S) -> Result<T, SessionError>,
) -> Result<T, SlotError> {
    let mut guard = slot.try_borrow_mut().map_err(|_| SlotError::Busy)?;
    let session = guard.as_mut().ok_or(SlotError::NotStarted)?;
    Ok(f(session)?)
}

/// Swaps the slot contents, returning the previous session.
pub fn replace_slot<S>(slot: &RefCell<Option<S>>, value: Option<S>) -> Result<Option<S>, SlotError> {
    let mut guard = slot.try_borrow_mut().map_err(|_| SlotError::Busy)?;
    Ok(std::mem::replace(&mut *guard, value))
}

#[cfg(test)]
mod tests {
    use super::{SlotError, replace_slot, with_slot};
    use catalog::CatalogError;
    use foundation::ids::CityId;
    use planner::SessionError;
    use std::cell::RefCell;

    #[test]
    fn empty_slot_is_not_started() {
        let slot: RefCell<Option<u32>> = RefCell::new(None);
        assert_eq!(with_slot(&slot, |v| Ok(*v)), Err(SlotError::NotStarted));
    }

    #[test]
    fn reentrant_call_is_busy_not_a_panic() {
        let slot = RefCell::new(Some(1_u32));
        let inner = with_slot(&slot, |v| {
            *v += 1;
            Ok(with_slot(&slot, |v| Ok(*v)))
        })
        .unwrap();
        assert_eq!(inner, Err(SlotError::Busy));
        assert_eq!(inner.unwrap_err().to_string(), "map session is busy");

        let replaced = with_slot(&slot, |_| Ok(replace_slot(&slot, None))).unwrap();
        assert_eq!(replaced, Err(SlotError::Busy));
        assert_eq!(slot.into_inner(), Some(2));
    }

    #[test]
    fn session_errors_pass_through() {
        let slot = RefCell::new(Some(0_u32));
        let err = with_slot(&slot, |_| -> Result<(), SessionError> {
            Err(CatalogError::UnknownCity(CityId(9)).into())
        })
        .unwrap_err();
        assert_eq!(
            err,
            SlotError::Session(SessionError::Catalog(CatalogError::UnknownCity(CityId(9))))
        );
    }

    #[test]
    fn replace_returns_previous_value() {
        let slot = RefCell::new(Some(3_u32));
        assert_eq!(replace_slot(&slot, Some(4)), Ok(Some(3)));
        assert_eq!(slot.into_inner(), Some(4));
    }
}
