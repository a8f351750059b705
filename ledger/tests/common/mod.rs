use {
  crowdfund_ledger::{Address, Campaign, Payouts},
  ed25519_dalek::Keypair,
};

/// Identity of a freshly generated ed25519 keypair.
pub fn identity() -> Address {
  Keypair::generate(&mut rand::thread_rng()).public.into()
}

pub fn identities<const N: usize>() -> [Address; N] {
  [(); N].map(|_| identity())
}

/// A campaign whose contributors have each donated the minimum.
pub struct Fixture {
  pub manager: Address,
  pub contributors: Vec<Address>,
  pub vendor: Address,
  pub campaign: Campaign,
  pub payouts: Payouts,
}

impl Fixture {
  pub fn new(minimum: u64, contributors: usize) -> anyhow::Result<Self> {
    let manager = identity();
    let mut campaign = Campaign::new(manager, minimum)?;
    let contributors: Vec<_> = (0..contributors).map(|_| identity()).collect();
    for contributor in &contributors {
      campaign.donate(*contributor, minimum)?;
    }

    Ok(Self {
      manager,
      contributors,
      vendor: identity(),
      campaign,
      payouts: Payouts::default(),
    })
  }

  /// Creates a request paying `value` to the vendor, approved by
  /// the first `approvals` contributors.
  pub fn approved_request(
    &mut self,
    value: u64,
    approvals: usize,
  ) -> anyhow::Result<usize> {
    let index = self.campaign.create_request(
      &self.manager,
      "electronics",
      value,
      self.vendor,
    )?;
    for contributor in self.contributors.iter().take(approvals) {
      self.campaign.approve(contributor, index)?;
    }
    Ok(index)
  }

  pub fn finalize(
    &mut self,
    index: usize,
  ) -> Result<(), crowdfund_ledger::FinalizeError> {
    self
      .campaign
      .finalize(&self.manager, index, &mut self.payouts)
  }
}
