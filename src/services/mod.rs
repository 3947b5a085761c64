//! Higher-level services composed from the API client: computed admin
//! stats, endpoint-probe health sampling, and the activity feed poller.

pub mod activity;
pub mod health;
pub mod stats;
