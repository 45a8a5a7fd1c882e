//! Confxform - resolve and apply configuration transforms for deployment packages.
//!
//! This library provides the core functionality for confxform, including:
//! - Transform rule parsing (`transform => source` pairs and suffix tokens)
//! - Resolution of the transform file a rule expects for a source file
//! - The convention that finds configuration files and applies transforms in place
//! - Configuration file cascade discovery and the deployment variable store
//!
//! # Example
//!
//! ```no_run
//! use confxform_cli::config::Variables;
//! use confxform_cli::convention::ConfigurationTransformsConvention;
//! use confxform_cli::fs::LocalFileSystem;
//! use confxform_cli::transformer::DryRunTransformer;
//! use std::path::Path;
//!
//! let mut variables = Variables::new();
//! variables.set("AutomaticallyRunConfigurationTransformationFiles", "True");
//! variables.set("Environment.Name", "Production");
//!
//! let fs = LocalFileSystem;
//! let convention = ConfigurationTransformsConvention::new(&fs, &fs, &DryRunTransformer);
//! let report = convention.install(Path::new("/deploy/acme/1.0.0"), &variables).unwrap();
//!
//! for applied in &report.applied {
//!     println!("{} <- {}", applied.source_file.display(), applied.transform_file.display());
//! }
//! ```

pub mod config;
pub mod convention;
pub mod error;
pub mod fs;
pub mod logging;
pub mod rules;
pub mod transformer;

pub use error::{ConfxformError, Result};
