mod account;
mod aggregate;
mod client;
pub mod errors;
mod models;
mod query;
pub mod store;
pub mod types;

pub use account::Account;
pub use client::StemClient;
pub use models::{Namespace, Portal, ResourceType, ALL_RESOURCE_TYPES};
pub use query::Query;
