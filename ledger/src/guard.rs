//! Precondition checks shared by campaign operations.
//!
//! Every operation runs all of its checks before touching state, these
//! helpers only read.

use {
  crate::{Campaign, RequestIndex, SpendingRequest},
  crowdfund_primitives::Address,
};

pub(crate) fn is_manager(campaign: &Campaign, caller: &Address) -> bool {
  campaign.manager() == caller
}

/// Looks up a request that can still change, or says why it can't.
pub(crate) fn pending_request(
  campaign: &Campaign,
  index: RequestIndex,
) -> Result<&SpendingRequest, PendingError> {
  let request = campaign
    .spending_request(index)
    .ok_or(PendingError::NotFound)?;
  if request.is_complete() {
    return Err(PendingError::Complete);
  }
  Ok(request)
}

pub(crate) enum PendingError {
  NotFound,
  Complete,
}

/// Strict majority with floor division on the right hand side:
/// 2 contributors need 2 approvals, 3 contributors need 2.
pub(crate) fn quorum_met(approvals: usize, contributors: usize) -> bool {
  approvals > contributors / 2
}

pub(crate) fn validate_request(
  description: &str,
  value: u64,
) -> Result<(), &'static str> {
  if description.trim().is_empty() {
    return Err("description must not be empty");
  }
  if value == 0 {
    return Err("value must be positive");
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::{quorum_met, validate_request};

  #[test]
  fn quorum_is_strict_majority() {
    assert!(!quorum_met(0, 0));
    assert!(!quorum_met(0, 1));
    assert!(quorum_met(1, 1));
    assert!(!quorum_met(1, 2));
    assert!(quorum_met(2, 2));
    assert!(!quorum_met(1, 3));
    assert!(quorum_met(2, 3));
    assert!(!quorum_met(2, 4));
    assert!(quorum_met(3, 4));
    assert!(quorum_met(3, 5));
  }

  #[test]
  fn request_fields() {
    assert!(validate_request("electronics", 32).is_ok());
    assert_eq!(
      validate_request("", 32),
      Err("description must not be empty")
    );
    assert_eq!(
      validate_request("  \t", 32),
      Err("description must not be empty")
    );
    assert_eq!(validate_request("electronics", 0), Err("value must be positive"));
  }
}
