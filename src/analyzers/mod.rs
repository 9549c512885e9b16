//! Per-intersection traffic estimation and rating.
//!
//! This module filters raw sub-daily pedestrian counts, annualizes the valid
//! days into AADPT and true directional ratios, extracts short-term composite
//! counts, and rates short-term ratio estimates by resampled error
//! statistics.

pub mod annual;
pub mod daily;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod sampler;
pub mod shortterm;
pub mod types;
pub mod utility;
