// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlights: boundary wrappers in the document, records in the registry.

pub mod apply;
pub mod registry;

pub use apply::Applier;
pub use registry::HighlightRegistry;
