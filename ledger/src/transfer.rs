use {
  crate::RequestIndex,
  crowdfund_primitives::Address,
  std::collections::{BTreeMap, BTreeSet},
  thiserror::Error,
};

/// Moves value out of the campaign pool to a recipient.
///
/// Implementations must either move the full amount or nothing at all.
/// The ledger marks a spending request complete only after `transfer`
/// returned `Ok`, and leaves it pending when it returns an error.
///
/// Transfers are idempotent per spending request: a second call for an
/// `index` that was already paid must succeed without moving anything.
/// A campaign snapshot that lost track of a completed disbursement can
/// then finalize the request again without paying twice.
pub trait Transfer {
  type Error: std::error::Error + Send + Sync + 'static;

  fn transfer(
    &mut self,
    index: RequestIndex,
    recipient: &Address,
    amount: u64,
  ) -> Result<(), Self::Error>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutsError {
  #[error("payout of {amount} to {recipient} overflows its received total")]
  Overflow { recipient: Address, amount: u64 },
}

/// Keeps the total value received by every recipient in memory.
#[derive(Debug, Default, Clone)]
pub struct Payouts {
  received: BTreeMap<Address, u64>,
  paid: BTreeSet<RequestIndex>,
}

impl Payouts {
  /// Total value transferred to `recipient` so far.
  pub fn balance_of(&self, recipient: &Address) -> u64 {
    self.received.get(recipient).copied().unwrap_or_default()
  }

  pub fn is_paid(&self, index: RequestIndex) -> bool {
    self.paid.contains(&index)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Address, &u64)> {
    self.received.iter()
  }
}

impl Transfer for Payouts {
  type Error = PayoutsError;

  fn transfer(
    &mut self,
    index: RequestIndex,
    recipient: &Address,
    amount: u64,
  ) -> Result<(), Self::Error> {
    if self.paid.contains(&index) {
      return Ok(());
    }

    let current = self.balance_of(recipient);
    let updated = current.checked_add(amount).ok_or(PayoutsError::Overflow {
      recipient: *recipient,
      amount,
    })?;
    self.received.insert(*recipient, updated);
    self.paid.insert(index);
    Ok(())
  }
}
