// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Build-pipeline adapter
//!
//! The host-facing surface: configuration resolution, the async hook
//! contract, and the per-build plugin driving collection, the completion
//! barrier, and policy injection.

mod config;
mod hooks;
mod plugin;

pub use config::{AppKind, BuildCommand, CspOptions, HostBuildConfig};
pub use hooks::{BuildHooks, BundleAsset, BundleContext, DevServer};
pub use plugin::{BuildPhase, CspPlugin};
