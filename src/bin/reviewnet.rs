// src/bin/reviewnet.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use reviewnet_core::config::Config;
use reviewnet_core::progress::FnSink;
use reviewnet_core::Engine;
use std::io::Write;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "reviewnet", version, about = "Co-review graph and review authenticity scoring")]
struct Cli {
    /// Dataset file of labeled review blocks
    #[arg(long, default_value = "foods.txt")]
    data: PathBuf,

    /// Cap on records ingested (overrides reviewnet.toml)
    #[arg(long)]
    max_records: Option<usize>,

    /// Show ingestion progress
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the dataset and report entity counts
    Build {
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// List reviews for a product id
    Product {
        id: String,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Look up a reviewer by id or display name
    Reviewer {
        #[arg(long, conflicts_with = "name")]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Score a hypothetical review for authenticity
    Rate {
        #[arg(long)]
        user: String,
        #[arg(long)]
        helpfulness: Option<f64>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Shortest co-review path between two reviewers
    Path { a: String, b: String },
    /// Reviewers in the top or bottom accuracy percentile
    Percentile {
        #[arg(long, conflicts_with = "bottom")]
        top: Option<u32>,
        #[arg(long)]
        bottom: Option<u32>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load();
    config.verbose = cli.verbose;
    if let Some(max) = cli.max_records {
        config.max_records = max;
    }
    config.validate().context("bad configuration")?;

    let mut engine = Engine::new();
    let verbose = config.verbose;
    let mut sink = FnSink(move |fraction: f64| {
        if verbose {
            eprint!("\r  ingesting {:>5.1}%", fraction * 100.0);
            let _ = std::io::stderr().flush();
        }
    });
    let result = engine
        .build_from_source(&cli.data, &config, &mut sink)
        .with_context(|| format!("could not read dataset {}", cli.data.display()))?;
    if verbose {
        eprintln!();
    }

    match cli.command {
        Commands::Build { format } => match format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            Format::Text => {
                println!(
                    "{} {} reviews, {} reviewers, {} products ({} dropped)",
                    "built:".green().bold(),
                    result.review_count,
                    result.reviewer_count,
                    result.product_count,
                    result.dropped_records
                );
            }
        },
        Commands::Product { id, format } => {
            let reviews = engine.reviews_for_product(&id);
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&reviews)?),
                Format::Text => {
                    if reviews.is_empty() {
                        println!("no reviews for product {}", id.yellow());
                    }
                    for review in reviews {
                        let summary = review.summary.as_deref().unwrap_or("");
                        println!(
                            "{} {} {}",
                            review.user_id.cyan(),
                            format!("{}*", review.score).yellow(),
                            summary
                        );
                    }
                }
            }
        }
        Commands::Reviewer { id, name } => {
            let reviewer = match (&id, &name) {
                (Some(id), _) => engine.reviewer_by_id(id),
                (None, Some(name)) => engine.reviewer_by_name(name),
                (None, None) => anyhow::bail!("pass --id or --name"),
            };
            match reviewer {
                Some(r) => println!(
                    "{} ({}) {} reviews, accuracy {:.4}, {} connections",
                    r.user_id.cyan(),
                    r.profile_name,
                    r.review_count(),
                    r.accuracy(),
                    engine.connection_count(&r.user_id).unwrap_or(0)
                ),
                None => println!("{}", "reviewer not found".yellow()),
            }
        }
        Commands::Rate {
            user,
            helpfulness,
            summary,
            body,
        } => {
            let score = engine.rate_fields(&config.rater, &user, helpfulness, summary, body);
            println!("review rating: {}", format!("{score:.4}").green().bold());
        }
        Commands::Path { a, b } => match engine.shortest_path_len(&a, &b) {
            Some(hops) => println!("{} -> {}: {} hops", a.cyan(), b.cyan(), hops),
            None => println!("{}", "no path (or unknown reviewer)".yellow()),
        },
        Commands::Percentile { top, bottom } => {
            let (label, reviewers) = match (top, bottom) {
                (Some(p), _) => ("top", engine.top_percentile(p)),
                (None, Some(p)) => ("bottom", engine.bottom_percentile(p)),
                (None, None) => anyhow::bail!("pass --top <p> or --bottom <p>"),
            };
            println!("{} {} reviewers:", label, reviewers.len());
            for r in reviewers {
                println!("  {} accuracy {:.4}", r.user_id.cyan(), r.accuracy());
            }
        }
    }

    Ok(())
}
