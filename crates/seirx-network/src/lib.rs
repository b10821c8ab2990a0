//! `seirx-network` — the static contact network of a simulation run.
//!
//! Nodes are agents (the network and the agent store share one `AgentId`
//! index space); undirected edges carry a [`ContactType`] label describing
//! interaction closeness.  The topology is immutable for the duration of a
//! run — only agent *state* changes day to day.
//!
//! | Module      | Contents                                   |
//! |-------------|--------------------------------------------|
//! | [`contact`] | `ContactType` ordinal label                |
//! | [`network`] | `ContactNetwork`, `ContactNetworkBuilder`  |
//! | [`error`]   | `NetworkError`, `NetworkResult`            |

pub mod contact;
pub mod error;
pub mod network;


pub use contact::ContactType;
pub use error::{NetworkError, NetworkResult};
pub use network::{ContactNetwork, ContactNetworkBuilder, NodeAttributes};
