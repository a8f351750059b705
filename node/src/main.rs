use {
  crate::{
    settings::{Command, SystemSettings},
    storage::{OnDiskStore, OnDiskVault},
  },
  anyhow::{anyhow, bail},
  clap::Parser,
  crowdfund_ledger::{Campaign, Host, RequestView, Store},
  crowdfund_primitives::Address,
  ed25519_dalek::Keypair,
  tracing::{debug, info},
  tracing_subscriber::EnvFilter,
};

mod settings;
mod storage;

type DiskHost = Host<OnDiskStore, OnDiskVault>;

fn main() -> anyhow::Result<()> {
  // configure logging, RUST_LOG overrides the default level
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let settings = SystemSettings::parse();
  debug!("startup settings: {settings:#?}");

  if let Command::Keygen = settings.command() {
    let keypair = Keypair::generate(&mut rand::thread_rng());
    println!("{}", Address::from(keypair.public));
    return Ok(());
  }

  let db = sled::open(settings.data_dir())?;
  let store = OnDiskStore::new(&db)?;
  let vault = OnDiskVault::new(&db)?;

  if let Command::Init { manager, minimum } = settings.command() {
    if store.load()?.is_some() {
      bail!(
        "a campaign already exists in {}",
        settings.data_dir().display()
      );
    }
    Host::create(Campaign::new(*manager, *minimum)?, store, vault)?;
    info!(%manager, minimum, "campaign created");
    return Ok(());
  }

  let host = Host::open(store, vault)?.ok_or_else(|| {
    anyhow!(
      "no campaign in {}, create one with `init` first",
      settings.data_dir().display()
    )
  })?;

  execute(&host, settings.command())
}

fn execute(host: &DiskHost, command: &Command) -> anyhow::Result<()> {
  match command {
    Command::Donate { caller, amount } => {
      host.donate(*caller, *amount)?;
      println!("balance: {}", host.balance());
    }
    Command::Request {
      caller,
      description,
      value,
      recipient,
    } => {
      let index =
        host.create_request(caller, description.as_str(), *value, *recipient)?;
      println!("request: {index}");
    }
    Command::Approve { caller, index } => {
      host.approve(caller, *index)?;
      print_request(*index, &request(host, *index)?);
    }
    Command::Finalize { caller, index } => {
      host.finalize(caller, *index)?;
      print_request(*index, &request(host, *index)?);
    }
    Command::Show => {
      let campaign = host.snapshot();
      println!("manager: {}", campaign.manager());
      println!("minimum contribution: {}", campaign.minimum_contribution());
      println!("contributors: {}", campaign.contributors_count());
      println!("donated: {}", campaign.donated());
      println!("disbursed: {}", campaign.disbursed());
      println!("balance: {}", campaign.balance());
      for (index, view) in campaign.requests().enumerate() {
        print_request(index, &view);
      }
    }
    Command::ShowRequest { index } => {
      print_request(*index, &request(host, *index)?);
      let paid = host.inspect_transfer(|v| v.is_paid(*index))?;
      println!("paid out: {paid}");
    }
    Command::Payouts { recipient } => {
      let received = host.inspect_transfer(|v| v.balance_of(recipient))?;
      println!("{recipient}: {received}");
    }
    Command::Init { .. } | Command::Keygen => {
      bail!("{command:?} does not operate on an existing campaign")
    }
  }
  Ok(())
}

fn request(host: &DiskHost, index: usize) -> anyhow::Result<RequestView> {
  host
    .request(index)
    .ok_or_else(|| anyhow!("there is no spending request at index {index}"))
}

fn print_request(index: usize, view: &RequestView) {
  println!(
    "#{index} {:?} value={} recipient={} approvals={} {}",
    view.description,
    view.value,
    view.recipient,
    view.approval_count,
    if view.complete { "complete" } else { "pending" }
  );
}
