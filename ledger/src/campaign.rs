use {
  crate::{
    guard::{self, PendingError},
    ApproveError,
    ConfigError,
    CreateError,
    DonateError,
    FinalizeError,
    RequestIndex,
    RequestView,
    SpendingRequest,
    Transfer,
  },
  crowdfund_primitives::Address,
  serde::{Deserialize, Serialize},
  std::collections::BTreeSet,
  tracing::info,
};

/// A participatory funding campaign.
///
/// Contributors join the campaign by donating at least the minimum
/// contribution, once each. The manager proposes spending requests
/// and may disburse a request's value to its recipient only after a
/// strict majority of the current contributors approved it.
///
/// Every operation checks all of its preconditions before mutating
/// anything, so a rejected operation leaves the campaign exactly as it
/// was. Operations take `&mut self`, one writer at a time; see
/// [`crate::Host`] for sharing a campaign across threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CampaignSnapshot")]
pub struct Campaign {
  manager: Address,
  minimum_contribution: u64,
  contributors: BTreeSet<Address>,
  requests: Vec<SpendingRequest>,

  /// Sum of all accepted donations.
  donated: u64,

  /// Sum of the values of all completed requests.
  disbursed: u64,
}

/// Wire form of a [`Campaign`], checked before it becomes one.
///
/// Field order matches `Campaign`, snapshots are encoded as arrays.
#[derive(Deserialize)]
struct CampaignSnapshot {
  manager: Address,
  minimum_contribution: u64,
  contributors: BTreeSet<Address>,
  requests: Vec<SpendingRequest>,
  donated: u64,
  disbursed: u64,
}

impl TryFrom<CampaignSnapshot> for Campaign {
  type Error = ConfigError;

  fn try_from(snapshot: CampaignSnapshot) -> Result<Self, Self::Error> {
    let mut campaign =
      Campaign::new(snapshot.manager, snapshot.minimum_contribution)?;

    let mut disbursed = 0u64;
    for request in &snapshot.requests {
      guard::validate_request(request.description(), request.value())
        .map_err(ConfigError::InvalidConfig)?;
      if !request
        .approvals()
        .all(|voter| snapshot.contributors.contains(voter))
      {
        return Err(ConfigError::InvalidConfig(
          "spending request approved by a non-contributor",
        ));
      }
      if request.is_complete() {
        disbursed = disbursed.saturating_add(request.value());
      }
    }

    if disbursed != snapshot.disbursed {
      return Err(ConfigError::InvalidConfig(
        "disbursed total does not match completed requests",
      ));
    }

    let paid_in = (snapshot.contributors.len() as u64)
      .saturating_mul(snapshot.minimum_contribution);
    if snapshot.donated < paid_in {
      return Err(ConfigError::InvalidConfig(
        "donated total is below the minimum paid by each contributor",
      ));
    }

    campaign.contributors = snapshot.contributors;
    campaign.requests = snapshot.requests;
    campaign.donated = snapshot.donated;
    campaign.disbursed = snapshot.disbursed;
    Ok(campaign)
  }
}

impl Campaign {
  /// Creates a campaign managed by `manager`.
  ///
  /// Both the manager and the minimum contribution are fixed
  /// for the lifetime of the campaign.
  pub fn new(
    manager: Address,
    minimum_contribution: u64,
  ) -> Result<Self, ConfigError> {
    if minimum_contribution == 0 {
      return Err(ConfigError::InvalidConfig(
        "minimum contribution must be positive",
      ));
    }

    Ok(Self {
      manager,
      minimum_contribution,
      contributors: BTreeSet::new(),
      requests: Vec::new(),
      donated: 0,
      disbursed: 0,
    })
  }

  /// Accepts a donation and makes `caller` a contributor.
  ///
  /// Each identity contributes at most once, joining is a one time
  /// payment and not a running balance.
  pub fn donate(
    &mut self,
    caller: Address,
    amount: u64,
  ) -> Result<(), DonateError> {
    if amount < self.minimum_contribution {
      return Err(DonateError::BelowMinimum {
        amount,
        minimum: self.minimum_contribution,
      });
    }

    if self.contributors.contains(&caller) {
      return Err(DonateError::AlreadyContributed(caller));
    }

    let donated = self
      .donated
      .checked_add(amount)
      .ok_or(DonateError::Overflow(amount))?;

    self.contributors.insert(caller);
    self.donated = donated;

    info!(
      %caller,
      amount,
      contributors = self.contributors.len(),
      "donation accepted"
    );
    Ok(())
  }

  /// Appends a new pending spending request and returns its index.
  ///
  /// The recipient is not checked against the contributors, it is
  /// usually an outside vendor.
  pub fn create_request(
    &mut self,
    caller: &Address,
    description: impl Into<String>,
    value: u64,
    recipient: Address,
  ) -> Result<RequestIndex, CreateError> {
    if !guard::is_manager(self, caller) {
      return Err(CreateError::NotManager(*caller));
    }

    let description = description.into();
    guard::validate_request(&description, value)
      .map_err(CreateError::InvalidRequest)?;

    let index = self.requests.len();
    self
      .requests
      .push(SpendingRequest::new(description, value, recipient));

    info!(index, value, %recipient, "spending request created");
    Ok(index)
  }

  /// Records `caller`'s approval of the request at `index`.
  pub fn approve(
    &mut self,
    caller: &Address,
    index: RequestIndex,
  ) -> Result<(), ApproveError> {
    let request = guard::pending_request(self, index).map_err(|e| match e {
      PendingError::NotFound => ApproveError::InvalidRequestIndex(index),
      PendingError::Complete => ApproveError::RequestAlreadyComplete(index),
    })?;

    if !self.contributors.contains(caller) {
      return Err(ApproveError::NotContributor(*caller));
    }

    if request.has_approved(caller) {
      return Err(ApproveError::AlreadyApproved(*caller, index));
    }

    self.requests[index].record_approval(*caller);

    info!(%caller, index, "spending request approved");
    Ok(())
  }

  /// Disburses the request at `index` to its recipient.
  ///
  /// Requires more approvals than half of the current contributors
  /// (floor division). The value is handed to `transfer` first and the
  /// request is marked complete only once the transfer succeeded, so a
  /// failed transfer leaves the request pending and the pool intact.
  pub fn finalize(
    &mut self,
    caller: &Address,
    index: RequestIndex,
    transfer: &mut impl Transfer,
  ) -> Result<(), FinalizeError> {
    if !guard::is_manager(self, caller) {
      return Err(FinalizeError::NotManager(*caller));
    }

    let request = guard::pending_request(self, index).map_err(|e| match e {
      PendingError::NotFound => FinalizeError::InvalidRequestIndex(index),
      PendingError::Complete => FinalizeError::RequestAlreadyComplete(index),
    })?;

    let contributors = self.contributors.len();
    if !guard::quorum_met(request.approval_count(), contributors) {
      return Err(FinalizeError::QuorumNotMet {
        index,
        approvals: request.approval_count(),
        half: contributors / 2,
      });
    }

    let recipient = *request.recipient();
    let value = request.value();

    transfer.transfer(index, &recipient, value).map_err(|e| {
      FinalizeError::TransferFailed {
        index,
        source: Box::new(e),
      }
    })?;

    self.requests[index].mark_complete();
    self.disbursed = self.disbursed.saturating_add(value);

    info!(index, value, %recipient, "spending request finalized");
    Ok(())
  }
}

/// Read-only queries.
impl Campaign {
  pub fn manager(&self) -> &Address {
    &self.manager
  }

  pub fn minimum_contribution(&self) -> u64 {
    self.minimum_contribution
  }

  /// Pooled balance: accepted donations minus completed disbursements.
  ///
  /// Custody of the funds belongs to the transfer collaborator, which
  /// may pay out more than was pooled here. The balance never goes
  /// below zero.
  pub fn balance(&self) -> u64 {
    self.donated.saturating_sub(self.disbursed)
  }

  pub fn donated(&self) -> u64 {
    self.donated
  }

  pub fn disbursed(&self) -> u64 {
    self.disbursed
  }

  pub fn contributors_count(&self) -> usize {
    self.contributors.len()
  }

  pub fn is_contributor(&self, identity: &Address) -> bool {
    self.contributors.contains(identity)
  }

  pub fn contributors(&self) -> impl Iterator<Item = &Address> {
    self.contributors.iter()
  }

  pub fn requests_count(&self) -> usize {
    self.requests.len()
  }

  pub fn spending_request(
    &self,
    index: RequestIndex,
  ) -> Option<&SpendingRequest> {
    self.requests.get(index)
  }

  pub fn request(&self, index: RequestIndex) -> Option<RequestView> {
    self.requests.get(index).map(SpendingRequest::view)
  }

  pub fn requests(&self) -> impl Iterator<Item = RequestView> + '_ {
    self.requests.iter().map(SpendingRequest::view)
  }

  /// False for unknown indices as well.
  pub fn has_approved(&self, index: RequestIndex, voter: &Address) -> bool {
    self
      .requests
      .get(index)
      .map(|r| r.has_approved(voter))
      .unwrap_or(false)
  }
}
