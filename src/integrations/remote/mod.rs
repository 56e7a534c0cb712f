pub mod client;

pub use client::{HttpRemoteStore, RemoteError, RemoteStore};

#[cfg(test)]
pub use client::MockRemoteStore;
