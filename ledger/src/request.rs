use {
  crowdfund_primitives::Address,
  serde::{Deserialize, Serialize},
  std::collections::BTreeSet,
};

/// Position of a spending request in its campaign, in creation order.
pub type RequestIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
  /// Collecting approvals, funds not moved yet.
  Pending,

  /// Funds were transferred to the recipient. Terminal.
  Complete,
}

/// A proposed disbursement out of the campaign pool.
///
/// Requests are created by the campaign manager, collect approvals
/// from contributors and are completed at most once, when the manager
/// finalizes them with a majority of contributors in favour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingRequest {
  description: String,
  value: u64,
  recipient: Address,
  approvals: BTreeSet<Address>,
  complete: bool,
}

impl SpendingRequest {
  pub(crate) fn new(description: String, value: u64, recipient: Address) -> Self {
    Self {
      description,
      value,
      recipient,
      approvals: BTreeSet::new(),
      complete: false,
    }
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn value(&self) -> u64 {
    self.value
  }

  pub fn recipient(&self) -> &Address {
    &self.recipient
  }

  pub fn approval_count(&self) -> usize {
    self.approvals.len()
  }

  pub fn approvals(&self) -> impl Iterator<Item = &Address> {
    self.approvals.iter()
  }

  pub fn has_approved(&self, voter: &Address) -> bool {
    self.approvals.contains(voter)
  }

  pub fn is_complete(&self) -> bool {
    self.complete
  }

  pub fn status(&self) -> Status {
    match self.complete {
      true => Status::Complete,
      false => Status::Pending,
    }
  }

  /// Records a yes vote. Returns false if the voter already voted.
  pub(crate) fn record_approval(&mut self, voter: Address) -> bool {
    self.approvals.insert(voter)
  }

  pub(crate) fn mark_complete(&mut self) {
    self.complete = true;
  }

  pub fn view(&self) -> RequestView {
    RequestView {
      description: self.description.clone(),
      value: self.value,
      recipient: self.recipient,
      approval_count: self.approvals.len(),
      complete: self.complete,
    }
  }
}

/// Read-only snapshot of a spending request, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
  pub description: String,
  pub value: u64,
  pub recipient: Address,
  pub approval_count: usize,
  pub complete: bool,
}
