//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); log lines carry
//! `entity_type`, ids, tickets and sizes as structured fields instead.
//!
//! ```bash
//! RUST_LOG=info cargo run      # actor lifecycle, writes, checkouts
//! RUST_LOG=debug cargo run     # plus every request and settlement
//! RUST_LOG=restaurant_client::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` and `RESTAURANT_WRITE_POLICY=reconcile`, a menu edit whose write is
//! rejected reads:
//!
//! ```text
//! INFO Replaced entity_type="MenuItem" id=item_4 ticket=write_3
//! WARN Backend request failed status=Some(500) error=Backend answered 500: ...
//! WARN Write failed, reverting entity_type="MenuItem" ticket=write_3 error=...
//! INFO Replace reverted entity_type="MenuItem" id=item_4
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
