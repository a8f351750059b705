mod campaign;
mod error;
mod guard;
mod host;
mod request;
mod store;
mod transfer;

pub use {
  campaign::Campaign,
  crowdfund_primitives::Address,
  error::{
    ApproveError,
    ConfigError,
    CreateError,
    DonateError,
    ErrorKind,
    FinalizeError,
    HostError,
  },
  host::Host,
  request::{RequestIndex, RequestView, SpendingRequest, Status},
  store::{InMemoryStore, Store},
  transfer::{Payouts, PayoutsError, Transfer},
};
