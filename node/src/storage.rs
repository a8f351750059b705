use {
  crowdfund_ledger::{Campaign, RequestIndex, Store, Transfer},
  crowdfund_primitives::Address,
  rmp_serde::{from_slice, to_vec},
  sled::{
    transaction::{
      ConflictableTransactionError,
      ConflictableTransactionResult,
      TransactionError,
      TransactionalTree,
    },
    Transactional,
  },
  thiserror::Error,
  tracing::debug,
};

const SNAPSHOT_KEY: &[u8] = b"state";

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("database error: {0}")]
  Db(#[from] sled::Error),

  #[error("campaign serialization failed: {0}")]
  Encode(#[from] rmp_serde::encode::Error),

  #[error("stored campaign is corrupt: {0}")]
  Decode(#[from] rmp_serde::decode::Error),

  #[error("stored payout total for {0} is corrupt")]
  CorruptPayout(Address),

  #[error("payout of {amount} to {recipient} overflows its received total")]
  Overflow { recipient: Address, amount: u64 },
}

/// Keeps the campaign snapshot in the `campaign` tree of a sled db.
pub struct OnDiskStore {
  tree: sled::Tree,
}

impl OnDiskStore {
  pub fn new(db: &sled::Db) -> Result<Self, sled::Error> {
    Ok(Self {
      tree: db.open_tree("campaign")?,
    })
  }
}

impl Store for OnDiskStore {
  type Error = StorageError;

  fn load(&self) -> Result<Option<Campaign>, Self::Error> {
    match self.tree.get(SNAPSHOT_KEY)? {
      Some(bytes) => Ok(Some(from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn commit(&mut self, campaign: &Campaign) -> Result<(), Self::Error> {
    self.tree.insert(SNAPSHOT_KEY, to_vec(campaign)?)?;
    self.tree.flush()?;
    Ok(())
  }
}

/// Records disbursements in a sled db.
///
/// The `payouts` tree maps base58 recipient addresses to the big-endian
/// total received so far. The `disbursements` tree maps each paid
/// spending request index to its recipient and value. Both are written
/// in one transaction, so a request index is credited at most once even
/// if the campaign snapshot recording its completion never made it to
/// disk. The vault only keeps books, moving real funds is up to whoever
/// reads them.
pub struct OnDiskVault {
  payouts: sled::Tree,
  disbursements: sled::Tree,
}

impl OnDiskVault {
  pub fn new(db: &sled::Db) -> Result<Self, sled::Error> {
    Ok(Self {
      payouts: db.open_tree("payouts")?,
      disbursements: db.open_tree("disbursements")?,
    })
  }

  pub fn balance_of(&self, recipient: &Address) -> Result<u64, StorageError> {
    match self.payouts.get(recipient.to_string())? {
      Some(bytes) => decode_total(recipient, &bytes),
      None => Ok(0),
    }
  }

  /// Whether the spending request at `index` was already paid out.
  pub fn is_paid(&self, index: RequestIndex) -> Result<bool, StorageError> {
    Ok(self.disbursements.contains_key(disbursement_key(index))?)
  }
}

fn disbursement_key(index: RequestIndex) -> [u8; 8] {
  (index as u64).to_be_bytes()
}

fn decode_total(
  recipient: &Address,
  bytes: &[u8],
) -> Result<u64, StorageError> {
  <[u8; 8]>::try_from(bytes)
    .map(u64::from_be_bytes)
    .map_err(|_| StorageError::CorruptPayout(*recipient))
}

/// Credits `recipient` and records the disbursement under `key`, unless
/// a disbursement is already recorded there. Returns whether it credited.
fn credit(
  payouts: &TransactionalTree,
  disbursements: &TransactionalTree,
  key: &[u8],
  record: &[u8],
  recipient: &Address,
  amount: u64,
) -> ConflictableTransactionResult<bool, StorageError> {
  if disbursements.get(key)?.is_some() {
    return Ok(false);
  }

  let current = match payouts.get(recipient.to_string())? {
    Some(bytes) => decode_total(recipient, &bytes)
      .map_err(ConflictableTransactionError::Abort)?,
    None => 0,
  };
  let updated = current.checked_add(amount).ok_or(
    ConflictableTransactionError::Abort(StorageError::Overflow {
      recipient: *recipient,
      amount,
    }),
  )?;

  payouts.insert(
    recipient.to_string().into_bytes(),
    updated.to_be_bytes().to_vec(),
  )?;
  disbursements.insert(key.to_vec(), record.to_vec())?;
  Ok(true)
}

impl Transfer for OnDiskVault {
  type Error = StorageError;

  fn transfer(
    &mut self,
    index: RequestIndex,
    recipient: &Address,
    amount: u64,
  ) -> Result<(), Self::Error> {
    let key = disbursement_key(index);
    let record = to_vec(&(recipient, amount))?;

    let credited = (&self.payouts, &self.disbursements)
      .transaction(|(payouts, disbursements)| {
        credit(payouts, disbursements, &key, &record, recipient, amount)
      })
      .map_err(|e| match e {
        TransactionError::Abort(e) => e,
        TransactionError::Storage(e) => StorageError::Db(e),
      })?;

    if credited {
      self.payouts.flush()?;
    } else {
      debug!(index, %recipient, "spending request already paid out");
    }
    Ok(())
  }
}
