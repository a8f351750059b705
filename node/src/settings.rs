use {
  clap::{Parser, Subcommand},
  crowdfund_primitives::Address,
  std::path::{Path, PathBuf},
};

/// Crowdfund Campaign Host
///
/// Keeps a single participatory funding campaign on disk and applies
/// one operation per invocation. Contributors join by donating,
/// the manager proposes spending requests, and a request pays out
/// only after a strict majority of contributors approved it.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// Directory of the campaign database
  #[clap(long, short,
    default_value = "crowdfund-data",
    value_name = "PATH")]
  data_dir: PathBuf,

  #[clap(subcommand)]
  command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
  /// Creates the campaign, the manager is fixed forever
  Init {
    #[clap(long, value_name = "ADDRESS")]
    manager: Address,

    /// Smallest accepted donation
    #[clap(long, value_name = "AMOUNT")]
    minimum: u64,
  },

  /// Joins the campaign as a contributor
  Donate {
    #[clap(long, value_name = "ADDRESS")]
    caller: Address,

    #[clap(long, value_name = "AMOUNT")]
    amount: u64,
  },

  /// Proposes a spending request (manager only)
  Request {
    #[clap(long, value_name = "ADDRESS")]
    caller: Address,

    #[clap(long, short, value_name = "TEXT")]
    description: String,

    #[clap(long, value_name = "AMOUNT")]
    value: u64,

    #[clap(long, value_name = "ADDRESS")]
    recipient: Address,
  },

  /// Approves a spending request (contributors only)
  Approve {
    #[clap(long, value_name = "ADDRESS")]
    caller: Address,

    #[clap(long, value_name = "INDEX")]
    index: usize,
  },

  /// Pays out an approved spending request (manager only)
  Finalize {
    #[clap(long, value_name = "ADDRESS")]
    caller: Address,

    #[clap(long, value_name = "INDEX")]
    index: usize,
  },

  /// Prints the campaign state
  Show,

  /// Prints one spending request
  ShowRequest {
    #[clap(long, value_name = "INDEX")]
    index: usize,
  },

  /// Prints the total received by a recipient
  Payouts {
    #[clap(long, value_name = "ADDRESS")]
    recipient: Address,
  },

  /// Generates a fresh ed25519 identity
  Keygen,
}

impl SystemSettings {
  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  pub fn command(&self) -> &Command {
    &self.command
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{Command, SystemSettings},
    clap::Parser,
    crowdfund_primitives::Address,
    std::path::Path,
  };

  #[test]
  fn parses_operations() -> anyhow::Result<()> {
    let caller = Address::from_bytes([1; 32]);
    let recipient = Address::from_bytes([2; 32]);
    let (caller_b58, recipient_b58) = (caller.to_string(), recipient.to_string());

    let settings = SystemSettings::try_parse_from([
      "crowdfund",
      "--data-dir",
      "/tmp/campaign",
      "request",
      "--caller",
      caller_b58.as_str(),
      "--description",
      "electronics",
      "--value",
      "32",
      "--recipient",
      recipient_b58.as_str(),
    ])?;

    assert_eq!(settings.data_dir(), Path::new("/tmp/campaign"));
    assert!(matches!(
      settings.command(),
      Command::Request { caller: c, description, value: 32, recipient: r }
        if *c == caller && description == "electronics" && *r == recipient
    ));
    Ok(())
  }

  #[test]
  fn defaults_data_dir() -> anyhow::Result<()> {
    let settings = SystemSettings::try_parse_from(["crowdfund", "show"])?;
    assert_eq!(settings.data_dir(), Path::new("crowdfund-data"));
    assert!(matches!(settings.command(), Command::Show));
    Ok(())
  }

  #[test]
  fn rejects_malformed_addresses() {
    let result = SystemSettings::try_parse_from([
      "crowdfund",
      "donate",
      "--caller",
      "not-an-address",
      "--amount",
      "1",
    ]);
    assert!(result.is_err());
  }
}
