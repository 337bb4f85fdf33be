// Library target holds the session and corpus machinery; main.rs is a thin
// CLI over it, and integration tests and benches import through here.
pub mod config;
pub mod corpus;
pub mod session;
pub mod store;
