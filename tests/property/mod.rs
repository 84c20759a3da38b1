// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of synthesis over generated configurations: purity,
//! certificate coverage, record uniqueness and export uniqueness.

mod synthesis;
