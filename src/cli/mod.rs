//! CLI infrastructure for the smartcab toolkit
//!
//! This module provides the command-line interface for training, evaluating,
//! comparing and tuning driving agents, and for summarizing their trial logs.

pub mod commands;
pub mod config;
pub mod output;
