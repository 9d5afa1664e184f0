//! Shared end-to-end test infrastructure.

pub mod client;
pub mod constants;
pub mod fixtures;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
