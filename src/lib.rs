//! Company identity and directory provisioning engine.
//!
//! Converges a host's groups, users and company directory tree to a
//! declared mapping of employees to roles and directories to roles.  Runs
//! are idempotent: a second run against a converged host only reports
//! already-satisfied steps.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: load and validate the company TOML file
//! - **[`registry`]**: employees, roles and directory requirements
//! - **[`policy`]**: the 770/774 directory permission tiers
//! - **[`engine`]**: the identity, directory and privilege passes
//! - **[`gateway`]**: the only component that changes the host
//! - **[`resources`]**: idempotent `check + apply` primitives behind the gateway
//! - **[`commands`]**: top-level subcommand orchestration (`converge`, `check`, `create-file`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod gateway;
pub mod logging;
pub mod policy;
pub mod registry;
pub mod resources;
