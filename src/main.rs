// ==============================================================================
// main.rs - Symetrics Lookup Entry Point
// ==============================================================================
// Description: Command-line entry point printing gene scores and variant
//              annotations as JSON
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use symetrics::{
    config, AnnotationRecord, Lookup, ScoreRecord, Symetrics, SymetricsConfig, VariantKey,
    VariantSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Annotation database (SILVA, SURF and SYNVEP tables)
    #[arg(long, env = "SYMETRICS_DB", default_value = config::DEFAULT_DATABASE)]
    database: PathBuf,

    /// Directory holding the {GROUP}_DATA.csv score tables
    #[arg(long, env = "SYMETRICS_DATA_DIR", default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Gene to report scores for
    #[arg(short, long, default_value = "A1BG")]
    gene: String,

    /// Metrics group to query (repeatable; defaults to every group)
    #[arg(long = "group")]
    groups: Vec<String>,

    /// Skip the gene score lookups
    #[arg(long)]
    no_gene_scores: bool,

    /// Variant source for --variant lookups (silva, surf or synvep)
    #[arg(short, long, default_value = "silva")]
    source: VariantSource,

    /// Variant to annotate as CHR:POS:REF:ALT (repeatable)
    #[arg(short, long = "variant")]
    variants: Vec<VariantKey>,
}

#[derive(Serialize)]
struct Entry<T> {
    query: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    records: Vec<T>,
}

impl<T> Entry<T> {
    fn new(query: String, outcome: Lookup<T>) -> Self {
        Self {
            query,
            status: outcome.status(),
            error: outcome.error().map(|e| e.to_string()),
            records: outcome.into_rows(),
        }
    }
}

#[derive(Serialize)]
struct Report {
    database: PathBuf,
    connected: bool,
    gene_scores: Vec<Entry<ScoreRecord>>,
    variant_annotations: Vec<Entry<AnnotationRecord>>,
}

fn main() -> Result<()> {
    // Initialize tracing (stderr, so stdout carries only the JSON report)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "symetrics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Symetrics lookup starting...");

    // Parse command line arguments
    let args = Args::parse();

    let symetrics = Symetrics::new(SymetricsConfig::new(args.database, args.data_dir));
    if !symetrics.store().is_connected() {
        warn!("Variant lookups will return no records: database unavailable");
    }

    let gene_scores = if args.no_gene_scores {
        Vec::new()
    } else if args.groups.is_empty() {
        symetrics
            .get_gene_scores_all_groups(&args.gene)
            .into_iter()
            .map(|(group, outcome)| Entry::new(format!("{}/{}", group, args.gene), outcome))
            .collect()
    } else {
        args.groups
            .iter()
            .map(|group| {
                Entry::new(
                    format!("{}/{}", group, args.gene),
                    symetrics.get_gene_score(group, &args.gene),
                )
            })
            .collect()
    };

    let variant_annotations: Vec<Entry<AnnotationRecord>> = args
        .variants
        .iter()
        .map(|key| {
            Entry::new(
                format!("{}/{} ({})", args.source, key, args.source.build().as_str()),
                symetrics.annotate(args.source, key),
            )
        })
        .collect();

    let report = Report {
        database: symetrics.config().database.clone(),
        connected: symetrics.store().is_connected(),
        gene_scores,
        variant_annotations,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize lookup report")?;
    println!("{}", json);

    info!(
        "Lookup complete: {} gene score queries, {} variant queries",
        report.gene_scores.len(),
        report.variant_annotations.len()
    );

    Ok(())
}
