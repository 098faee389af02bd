pub mod client;
pub mod query;
pub mod repository;

pub use client::{DataClient, DataServiceError};
pub use query::TableQuery;
pub use repository::{AuthenticatedRepository, ListOptions};
