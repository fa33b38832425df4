use crate::models::RequestStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
}

/// Validates if a status transition is allowed.
///
/// Completed and cancelled are terminal: nothing leaves them, and repeating a
/// terminal status is rejected rather than treated as a no-op, so completing an
/// already-completed request surfaces an error.
pub fn validate_transition(
    from: RequestStatus,
    to: RequestStatus,
) -> Result<(), TransitionError> {
    use RequestStatus::*;

    match (from, to) {
        (Pending, InProgress) => Ok(()),
        (Pending, Cancelled) => Ok(()),
        (InProgress, Completed) => Ok(()),
        (InProgress, Cancelled) => Ok(()),

        // All other transitions are invalid
        _ => Err(TransitionError::InvalidTransition { from, to }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_in_progress_valid() {
        assert!(validate_transition(RequestStatus::Pending, RequestStatus::InProgress).is_ok());
    }

    #[test]
    fn test_pending_to_cancelled_valid() {
        assert!(validate_transition(RequestStatus::Pending, RequestStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_in_progress_to_completed_valid() {
        assert!(validate_transition(RequestStatus::InProgress, RequestStatus::Completed).is_ok());
    }

    #[test]
    fn test_in_progress_to_cancelled_valid() {
        assert!(validate_transition(RequestStatus::InProgress, RequestStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_pending_to_completed_invalid() {
        let result = validate_transition(RequestStatus::Pending, RequestStatus::Completed);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            TransitionError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(validate_transition(RequestStatus::Completed, RequestStatus::Pending).is_err());
        assert!(validate_transition(RequestStatus::Completed, RequestStatus::InProgress).is_err());
        assert!(validate_transition(RequestStatus::Completed, RequestStatus::Cancelled).is_err());
        assert!(validate_transition(RequestStatus::Completed, RequestStatus::Completed).is_err());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(validate_transition(RequestStatus::Cancelled, RequestStatus::Pending).is_err());
        assert!(validate_transition(RequestStatus::Cancelled, RequestStatus::InProgress).is_err());
    }

    #[test]
    fn test_in_progress_to_pending_invalid() {
        assert!(validate_transition(RequestStatus::InProgress, RequestStatus::Pending).is_err());
    }
}
