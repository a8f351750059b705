use {crate::RequestIndex, crowdfund_primitives::Address, thiserror::Error};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of every rejection the ledger can report.
///
/// All of them are rejections checked before any mutation, so a caller
/// may use the kind to decide whether retrying with corrected input
/// makes sense, but never needs to repair state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// The caller lacks the role the operation requires.
  Authorization,

  /// Malformed or out-of-range input.
  Validation,

  /// The transition is not legal in the current state.
  Conflict,

  /// An external collaborator refused to carry out its part.
  Collaborator,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("invalid campaign configuration: {0}")]
  InvalidConfig(&'static str),
}

impl ConfigError {
  pub fn kind(&self) -> ErrorKind {
    ErrorKind::Validation
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DonateError {
  #[error("donation of {amount} is below the minimum contribution of {minimum}")]
  BelowMinimum { amount: u64, minimum: u64 },

  #[error("{0} has already contributed to this campaign")]
  AlreadyContributed(Address),

  #[error("donation of {0} would overflow the pooled balance")]
  Overflow(u64),
}

impl DonateError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::BelowMinimum { .. } | Self::Overflow(_) => ErrorKind::Validation,
      Self::AlreadyContributed(_) => ErrorKind::Conflict,
    }
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateError {
  #[error("{0} is not the manager of this campaign")]
  NotManager(Address),

  #[error("invalid spending request: {0}")]
  InvalidRequest(&'static str),
}

impl CreateError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotManager(_) => ErrorKind::Authorization,
      Self::InvalidRequest(_) => ErrorKind::Validation,
    }
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApproveError {
  #[error("there is no spending request at index {0}")]
  InvalidRequestIndex(RequestIndex),

  #[error("{0} is not a contributor of this campaign")]
  NotContributor(Address),

  #[error("spending request {0} is already complete")]
  RequestAlreadyComplete(RequestIndex),

  #[error("{0} has already approved spending request {1}")]
  AlreadyApproved(Address, RequestIndex),
}

impl ApproveError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidRequestIndex(_) => ErrorKind::Validation,
      Self::NotContributor(_) => ErrorKind::Authorization,
      Self::RequestAlreadyComplete(_) | Self::AlreadyApproved(..) => {
        ErrorKind::Conflict
      }
    }
  }
}

#[derive(Debug, Error)]
pub enum FinalizeError {
  #[error("{0} is not the manager of this campaign")]
  NotManager(Address),

  #[error("there is no spending request at index {0}")]
  InvalidRequestIndex(RequestIndex),

  #[error("spending request {0} is already complete")]
  RequestAlreadyComplete(RequestIndex),

  #[error(
    "spending request {index} has {approvals} approvals, more than {half} \
     are needed"
  )]
  QuorumNotMet {
    index: RequestIndex,
    approvals: usize,
    half: usize,
  },

  #[error("transfer for spending request {index} failed: {source}")]
  TransferFailed {
    index: RequestIndex,
    #[source]
    source: BoxError,
  },
}

impl FinalizeError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NotManager(_) => ErrorKind::Authorization,
      Self::InvalidRequestIndex(_) => ErrorKind::Validation,
      Self::RequestAlreadyComplete(_) | Self::QuorumNotMet { .. } => {
        ErrorKind::Conflict
      }
      Self::TransferFailed { .. } => ErrorKind::Collaborator,
    }
  }
}

/// Failure of an operation submitted through a [`crate::Host`].
#[derive(Debug, Error)]
pub enum HostError<E: std::error::Error + 'static> {
  /// The campaign rejected the operation, nothing was changed.
  #[error(transparent)]
  Rejected(E),

  /// The store could not persist the new campaign state.
  #[error("failed to persist campaign state")]
  Store(#[source] BoxError),
}

impl<E: std::error::Error + 'static> HostError<E> {
  /// The campaign's own rejection, if that is what happened.
  pub fn rejection(&self) -> Option<&E> {
    match self {
      Self::Rejected(e) => Some(e),
      Self::Store(_) => None,
    }
  }
}
