//! SBMOD Control - Provisioning facade
//!
//! Wires the pipeline together and owns everything around it: engine
//! settings, input documents, logging and per-namespace serialization.
//!
//! ```no_run
//! use sbmod_control::{load_document, EngineConfig, Provisioner};
//! use sbmod_reconcile::InMemoryBackend;
//! use std::sync::Arc;
//!
//! # async fn run() -> sbmod_control::Result<()> {
//! let config = EngineConfig::load(Some("sbmod.toml"))?;
//! sbmod_control::init_tracing(&config.logging)?;
//!
//! let provisioner = Provisioner::builder()
//!     .with_config(config)
//!     .with_in_memory(Arc::new(InMemoryBackend::new()))
//!     .build()?;
//!
//! let outcome = provisioner.apply(load_document("namespace.yaml")?).await?;
//! println!("{}", outcome.plan.summary());
//! println!("{}", outcome.outputs.to_json().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architectural Boundaries
//!
//! - **sbmod-control** owns: the pass sequence, namespace locks, settings, telemetry
//! - **Pipeline crates** stay pure and lock-free
//!
//! ## Key Concepts
//!
//! - **Provisioner**: validate → build → reconcile → apply → project
//! - **EngineConfig**: Defaults, optional file, `SBMOD_` environment overrides

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod document;
pub mod error;
pub mod provisioner;
pub mod telemetry;

pub use config::{ApplyConfig, EngineConfig, LoggingConfig, ProviderConfig};
pub use document::{load_document, parse_document, DocumentFormat};
pub use error::{ProvisionError, Result};
pub use provisioner::{ApplyOutcome, PlanOutcome, Provisioner, ProvisionerBuilder};
pub use telemetry::init_tracing;
