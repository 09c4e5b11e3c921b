//! External service providers.
//!
//! Providers wrap third-party APIs behind traits so that services can
//! be tested against mocks and deployments can swap endpoints.

pub mod ai;
