//! Process-wide default thermodynamic context.
//!
//! Streams built without an explicit context use the one installed here.
//! The default lives in thread-local storage, matching the single-threaded
//! ownership of streams.

use crate::error::{ThermoError, ThermoResult};
use crate::thermo::Thermo;
use std::cell::RefCell;

thread_local! {
    static DEFAULT_THERMO: RefCell<Option<Thermo>> = const { RefCell::new(None) };
}

/// Install `thermo` as the default context, returning the previous one.
pub fn set_thermo(thermo: Thermo) -> Option<Thermo> {
    tracing::debug!(chemicals = thermo.chemicals().len(), "default thermo set");
    DEFAULT_THERMO.with(|cell| cell.borrow_mut().replace(thermo))
}

/// The default context.
pub fn get_thermo() -> ThermoResult<Thermo> {
    DEFAULT_THERMO.with(|cell| cell.borrow().clone().ok_or(ThermoError::NoThermo))
}

/// Remove the default context.
pub fn clear_thermo() -> Option<Thermo> {
    DEFAULT_THERMO.with(|cell| cell.borrow_mut().take())
}
