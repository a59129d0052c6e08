//! Policy based population of guest interface records.
//!
//! A caller starts from an empty [`NicConfig`](crate::interface::NicConfig),
//! applies the guest frontend, exactly one host backend, and optionally a
//! traffic filter, then hands the record to the domain serializer.

pub mod backend;
pub mod filter;
pub mod frontend;

pub use backend::{
    set_host_backend, set_host_backend_bridge, set_host_backend_ethernet, set_host_backend_ovs,
    HostBackend,
};
pub use filter::{set_host_backend_filter, FilterSpec};
pub use frontend::{set_guest_frontend, Frontend};
