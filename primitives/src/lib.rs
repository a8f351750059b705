mod address;

pub use address::{Address, Error as AddressError};
