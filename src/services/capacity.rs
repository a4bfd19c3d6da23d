//! Capacity rules for crew assignments.
//!
//! Both store implementations call these while holding the crew lock, so the
//! open count they pass in is the authoritative one.

use crate::error::AppError;

/// Rejects the assignment when the crew already holds `limite` open
/// assignments. A crew with limit N accepts its Nth assignment.
pub fn check_admission(cuadrilla_id: i64, abiertos: i64, limite: i32) -> Result<(), AppError> {
    if abiertos >= i64::from(limite) {
        return Err(AppError::CapacityExceeded {
            cuadrilla_id,
            limite,
        });
    }
    Ok(())
}

pub fn is_available(abiertos: i64, limite: i32) -> bool {
    abiertos < i64::from(limite)
}

/// Removes the most recent occurrence of `reclamo_id` from the historical
/// list. Returns false when it was not present.
pub fn remove_last(historial: &mut Vec<i64>, reclamo_id: i64) -> bool {
    match historial.iter().rposition(|id| *id == reclamo_id) {
        Some(pos) => {
            historial.remove(pos);
            true
        }
        None => false,
    }
}
