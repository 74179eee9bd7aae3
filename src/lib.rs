#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "This crate contains all the core business logic, domain models, authentication"]
#![doc = "mechanisms, routing configuration, and error handling for the tasktrack API."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;

// lib.rs primarily declares modules for the library crate; the application
// factory lives in main.rs and the integration tests assemble their own App
// instances from these pieces.
