//! # Restaurant Client
//!
//! > **Client core for a restaurant ordering and management system.**
//!
//! The crate keeps an in-progress order (the *cart*) and local copies of the menu, item
//! categories and ingredient inventory, and writes changes through to a REST backend.
//! Edits show up locally at once; the backend request happens in the background.
//!
//! ## Architecture Notes
//!
//! ### 1. One owner per piece of state
//! The cart and each cached list live inside their own actor (a Tokio task with an mpsc
//! inbox). Requests are processed one at a time, so no lock guards the state, and every
//! update replaces the state in a single step.
//!
//! ### 2. Optimistic writes, tracked
//! Menu and ingredient edits are applied before the backend answers. Each one is tracked
//! as a pending write; how its settlement is folded back in is set by
//! [`WritePolicy`](framework::WritePolicy).
//!
//! ### 3. Late binding
//! Actors are created first and receive their dependencies (backend client, credential
//! store, recovery channel) when their `run` loop starts. See
//! [`BackendContext`](framework::BackendContext).
//!
//! ### 4. Errors lead somewhere
//! Failed requests are never shown as messages. The shared handlers in [`api::recovery`]
//! log them and, for authentication or authorization failures, tell the UI to reload or
//! navigate.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`CacheActor`](framework::CacheActor) behind every cached list.
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! [`DraftStore`](lifecycle::DraftStore) fetches the reference data, spins up the actors,
//! wires the cart to the menu, and shuts everything down.
//!
//! ### 3. The Interface ([`clients`])
//! Domain clients such as [`CartClient`](clients::CartClient) and
//! [`MenuItemClient`](clients::MenuItemClient) hide the message passing.
//!
//! ### 4. The Domain ([`store`], [`model`])
//! The pure [`Cart`](store::Cart) value, the order editor, and the backend's data shapes.
//!
//! ### 5. The Edges ([`api`], [`auth`], [`config`])
//! REST transport and typed endpoints, credentials and role-gated routing, environment
//! configuration.
//!
//! ## Running the Demo
//!
//! ```bash
//! RESTAURANT_API_URL=http://localhost:8080 RUST_LOG=info cargo run -- /customer
//! ```

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod store;
