//! # Reference Subcommand
//!
//! Searches and browses reference codes (IRAC notes and any configured
//! bundle). Without a configured bundle the built-in IRAC notes are used.
//!
//! ```bash
//! sfaf reference search drone
//! sfaf reference category coordination
//! sfaf reference categories
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};

use sfaf_rules::{ReferenceData, ReferenceEntry};

use crate::config::EngineConfig;

/// Reference subcommand arguments.
#[derive(Args, Debug)]
pub struct ReferenceArgs {
    #[command(subcommand)]
    pub command: ReferenceCommand,
}

/// Available reference subcommands.
#[derive(Subcommand, Debug)]
pub enum ReferenceCommand {
    /// Case-insensitive search over codes, titles and descriptions.
    Search {
        /// Text to look for.
        query: String,
    },

    /// List the entries of one category (e.g. coordination, limitation).
    Category {
        /// Category key.
        key: String,
    },

    /// List the category names.
    Categories,
}

/// Execute the reference subcommand.
pub fn run_reference(args: &ReferenceArgs, config: &EngineConfig) -> Result<u8> {
    let data = reference_data(config);
    let lines = match &args.command {
        ReferenceCommand::Search { query } => render_entries(&data.search(query)),
        ReferenceCommand::Category { key } => render_entries(&data.by_category(key)),
        ReferenceCommand::Categories => data
            .category_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    if lines.is_empty() {
        println!("No matching reference entries.");
    } else {
        for line in &lines {
            println!("{line}");
        }
        println!();
        println!("Total: {}", lines.len());
    }
    Ok(0)
}

/// The configured bundle, or the built-in IRAC notes.
pub fn reference_data(config: &EngineConfig) -> Arc<ReferenceData> {
    if config.reference_data.is_some() {
        config.reference_loader().get()
    } else {
        Arc::new(ReferenceData::builtin_irac_notes())
    }
}

/// One `CODE  title` line per entry.
pub fn render_entries(entries: &[&ReferenceEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| format!("  {:<6} {}", e.code, e.title))
        .collect()
}
