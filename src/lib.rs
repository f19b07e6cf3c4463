pub mod amount;
pub mod config;
pub mod controller;
pub mod csv;
pub mod currency;
pub mod display;
pub mod feed;
pub mod fetch;
pub mod model;
pub mod session;
pub mod view;
pub mod wire;

pub use amount::Amount;
pub use config::FeedConfig;
pub use controller::{Command, FeedController, FetchError, ViewState};
pub use fetch::PageFetcher;
pub use model::{FeedFilter, Page, Transaction, TransactionType, TxId};
pub use session::FeedSession;
