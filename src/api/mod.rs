//! Backend REST client, split by audience: shared transport in
//! `client`, then employee, supervisor, and admin operation sets as
//! `impl ApiClient` blocks.

pub mod admin;
pub mod client;
pub mod employee;
pub mod supervisor;

pub use client::ApiClient;
pub use supervisor::SupervisorRole;
