use {crate::Campaign, std::convert::Infallible};

/// Durable home of a campaign between operations.
///
/// Stores hold whole snapshots: every commit replaces the previous one,
/// so a store that missed a commit is caught up by the next one.
pub trait Store {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Returns the most recently committed campaign, if any.
  fn load(&self) -> Result<Option<Campaign>, Self::Error>;

  /// Replaces the stored campaign with `campaign`.
  fn commit(&mut self, campaign: &Campaign) -> Result<(), Self::Error>;
}

/// Ephemeral store, used in tests and by hosts that don't need
/// their campaign to outlive the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  snapshot: Option<Campaign>,
  commits: usize,
}

impl InMemoryStore {
  /// Number of successful commits since creation.
  pub fn commits(&self) -> usize {
    self.commits
  }
}

impl Store for InMemoryStore {
  type Error = Infallible;

  fn load(&self) -> Result<Option<Campaign>, Self::Error> {
    Ok(self.snapshot.clone())
  }

  fn commit(&mut self, campaign: &Campaign) -> Result<(), Self::Error> {
    self.snapshot = Some(campaign.clone());
    self.commits += 1;
    Ok(())
  }
}
