use {
  crate::{
    ApproveError,
    Campaign,
    CreateError,
    DonateError,
    FinalizeError,
    HostError,
    RequestIndex,
    RequestView,
    Store,
    Transfer,
  },
  crowdfund_primitives::Address,
  parking_lot::Mutex,
  tracing::{debug, error},
};

/// Hosts one campaign together with its collaborators.
///
/// All operations go through a single lock, so they are totally
/// ordered and never observe each other half way. Each operation is
/// applied to a staged copy of the campaign, the copy is committed to
/// the store and only then becomes the hosted state. A rejected
/// operation or a failed commit leaves the hosted campaign untouched,
/// with one exception: once a disbursement went out through the
/// transfer collaborator it can't be taken back, so a finalized
/// request stays complete even if its commit failed.
///
/// A host reopened from a store that missed such a commit sees the
/// request as pending again. Finalizing it once more is safe because
/// transfers are idempotent per request, see [`Transfer`].
pub struct Host<S, T> {
  inner: Mutex<Inner<S, T>>,
}

struct Inner<S, T> {
  campaign: Campaign,
  store: S,
  transfer: T,
}

impl<S: Store, T: Transfer> Host<S, T> {
  /// Starts hosting a new campaign and commits its initial state.
  pub fn create(
    campaign: Campaign,
    mut store: S,
    transfer: T,
  ) -> Result<Self, S::Error> {
    store.commit(&campaign)?;
    Ok(Self::with_parts(campaign, store, transfer))
  }

  /// Resumes the campaign last committed to `store`.
  ///
  /// Returns `None` if the store holds no campaign.
  pub fn open(store: S, transfer: T) -> Result<Option<Self>, S::Error> {
    Ok(
      store
        .load()?
        .map(|campaign| Self::with_parts(campaign, store, transfer)),
    )
  }

  fn with_parts(campaign: Campaign, store: S, transfer: T) -> Self {
    Self {
      inner: Mutex::new(Inner {
        campaign,
        store,
        transfer,
      }),
    }
  }

  pub fn donate(
    &self,
    caller: Address,
    amount: u64,
  ) -> Result<(), HostError<DonateError>> {
    self.transact("donate", false, |campaign, _| {
      campaign.donate(caller, amount)
    })
  }

  pub fn create_request(
    &self,
    caller: &Address,
    description: impl Into<String>,
    value: u64,
    recipient: Address,
  ) -> Result<RequestIndex, HostError<CreateError>> {
    let description = description.into();
    self.transact("create_request", false, |campaign, _| {
      campaign.create_request(caller, description, value, recipient)
    })
  }

  pub fn approve(
    &self,
    caller: &Address,
    index: RequestIndex,
  ) -> Result<(), HostError<ApproveError>> {
    self.transact("approve", false, |campaign, _| {
      campaign.approve(caller, index)
    })
  }

  pub fn finalize(
    &self,
    caller: &Address,
    index: RequestIndex,
  ) -> Result<(), HostError<FinalizeError>> {
    self.transact("finalize", true, |campaign, transfer| {
      campaign.finalize(caller, index, transfer)
    })
  }

  pub fn balance(&self) -> u64 {
    self.inner.lock().campaign.balance()
  }

  pub fn contributors_count(&self) -> usize {
    self.inner.lock().campaign.contributors_count()
  }

  pub fn request(&self, index: RequestIndex) -> Option<RequestView> {
    self.inner.lock().campaign.request(index)
  }

  /// A copy of the hosted campaign as of now.
  pub fn snapshot(&self) -> Campaign {
    self.inner.lock().campaign.clone()
  }

  /// Runs `f` against the transfer collaborator, under the host lock.
  pub fn inspect_transfer<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    f(&self.inner.lock().transfer)
  }

  /// Stops hosting and hands back the campaign and its collaborators.
  pub fn into_parts(self) -> (Campaign, S, T) {
    let inner = self.inner.into_inner();
    (inner.campaign, inner.store, inner.transfer)
  }

  /// `moves_funds` marks operations whose success already sent value
  /// through the transfer collaborator.
  fn transact<R, E>(
    &self,
    op: &'static str,
    moves_funds: bool,
    f: impl FnOnce(&mut Campaign, &mut T) -> Result<R, E>,
  ) -> Result<R, HostError<E>>
  where
    E: std::error::Error + 'static,
  {
    let mut guard = self.inner.lock();
    let inner = &mut *guard;

    let mut staged = inner.campaign.clone();
    let output = f(&mut staged, &mut inner.transfer).map_err(|e| {
      debug!(op, error = %e, "operation rejected");
      HostError::Rejected(e)
    })?;

    if let Err(e) = inner.store.commit(&staged) {
      error!(op, error = %e, "failed to persist campaign state");
      if moves_funds {
        inner.campaign = staged;
      }
      return Err(HostError::Store(Box::new(e)));
    }

    inner.campaign = staged;
    Ok(output)
  }
}
