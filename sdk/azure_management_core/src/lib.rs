#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod operation;
pub mod request;
pub mod xml;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{ManagementError, ManagementResult};

// Key types must be shareable across tasks and threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    let _ = assert_send_sync::<client::ManagementClient>;
    let _ = assert_send_sync::<auth::ManagementCertificate>;
    let _ = assert_send_sync::<ManagementError>;
};
