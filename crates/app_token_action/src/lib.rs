//! A GitHub Action that mints a GitHub App installation token for an
//! organization or repository and revokes it when the job ends.
//!
//! The action runs in two phases. The main step ([`acquire`]) exchanges the
//! App credentials for an installation token, masks it, publishes it as the
//! `token` output and saves it as state. The post step ([`release`]) reads the
//! saved token back and revokes it.

pub mod acquire;
pub mod context;
pub mod errors;
pub mod identity;
pub mod inputs;
pub mod release;
pub mod runner;

#[cfg(test)]
mod test_support;
