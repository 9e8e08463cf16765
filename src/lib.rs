#![doc = "The `blogforge` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, the authentication chain (credential store,"]
#![doc = "token service, access guard), the persistence ports and their PostgreSQL and"]
#![doc = "in-memory adapters, routing and error handling for the blogging API."]
#![doc = "The binary (`main.rs`) only reads configuration, picks a store and serves `app::create_app`."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::app::create_app;
pub use crate::error::AppError;
pub use crate::state::AppState;
