pub mod config;
pub mod error;
pub mod incident;
pub mod io;
pub mod paths;
pub mod report;
pub mod store;
pub mod types;
pub mod user;

pub use error::{Result, TicketsError};
pub use incident::{Incident, IncidentFilter, IncidentListing, IncidentUpdate};
pub use report::{IncidentSummary, UserIncidentCount};
pub use store::Store;
pub use types::Priority;
pub use user::User;
