use {
  ed25519_dalek::PublicKey,
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
  thiserror::Error,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("invalid base58 string: {0}")]
  InvalidBase58(#[from] bs58::decode::Error),

  #[error("an address must be exactly 32 bytes long, got {0}")]
  InvalidLength(usize),
}

/// Identifies a participant of a campaign.
///
/// The same type is used for managers, contributors and recipients
/// of disbursements. It is opaque to the ledger, which only compares
/// addresses for equality and keeps them in ordered sets.
///
/// Usually an address is the public key of an ed25519 keypair held
/// by the participant, but any 32 bytes are accepted, so an external
/// vendor receiving funds does not need to hold a key at all.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
  pub const fn from_bytes(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }

  pub fn to_bytes(&self) -> [u8; 32] {
    self.0
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for Address {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", bs58::encode(self.0).into_string())
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "address({})", bs58::encode(self.0).into_string())
  }
}

impl From<Address> for String {
  fn from(addr: Address) -> Self {
    bs58::encode(addr.0).into_string()
  }
}

impl FromStr for Address {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let bytes = bs58::decode(s).into_vec()?;
    let bytes: [u8; 32] = bytes
      .try_into()
      .map_err(|b: Vec<u8>| Error::InvalidLength(b.len()))?;
    Ok(Self(bytes))
  }
}

impl TryFrom<&str> for Address {
  type Error = Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    FromStr::from_str(value)
  }
}

impl From<PublicKey> for Address {
  fn from(p: PublicKey) -> Self {
    Self(*p.as_bytes())
  }
}

impl From<&PublicKey> for Address {
  fn from(p: &PublicKey) -> Self {
    Self(*p.as_bytes())
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{Address, Error},
    ed25519_dalek::Keypair,
  };

  #[test]
  fn base58_text_form() -> anyhow::Result<()> {
    let keypair = Keypair::generate(&mut rand::thread_rng());
    let address = Address::from(keypair.public);

    let text = address.to_string();
    assert_eq!(text, bs58::encode(keypair.public.as_bytes()).into_string());
    assert_eq!(text.parse::<Address>()?, address);
    assert_eq!(format!("{address:?}"), format!("address({text})"));

    Ok(())
  }

  #[test]
  fn rejects_malformed_text() {
    assert_eq!(
      "abc".parse::<Address>(),
      Err(Error::InvalidLength(bs58::decode("abc").into_vec().unwrap().len()))
    );
    assert!(matches!(
      "0OIl".parse::<Address>(),
      Err(Error::InvalidBase58(_))
    ));
  }

  #[test]
  fn serde_keeps_raw_bytes() -> anyhow::Result<()> {
    let address = Address::from_bytes([7u8; 32]);
    let bytes = rmp_serde::to_vec(&address)?;
    assert_eq!(rmp_serde::from_slice::<Address>(&bytes)?, address);
    assert_eq!(address.to_bytes(), [7u8; 32]);
    Ok(())
  }
}
