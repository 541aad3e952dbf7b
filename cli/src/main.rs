use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use numeric_annotation_core::config::AggregationKind;
use numeric_annotation_core::{Annotation, Annotator, CoreConfig, GraphRegistry, Learner};

mod input;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Learn background knowledge from tables and annotate numeric columns")]
struct Args {
    /// Config file path
    #[clap(short, long, env = "ANNOTATION_CONFIG", global = true)]
    config: Option<String>,

    /// Name of the background knowledge graph
    #[clap(short, long, env = "ANNOTATION_GRAPH", default_value = "default", global = true)]
    graph: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Learn tables, then annotate the numeric columns of other tables
    Annotate {
        /// Table documents to learn from
        #[clap(long, required = true, num_args = 1..)]
        learn: Vec<PathBuf>,

        /// Table documents to annotate
        #[clap(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Ranked entries kept per column
        #[clap(short, long, env = "ANNOTATION_K")]
        k: Option<usize>,

        /// Ranking function
        #[clap(long, value_enum, env = "ANNOTATION_AGGREGATION")]
        aggregation: Option<Aggregation>,

        /// Nearest nodes kept per query node
        #[clap(long, env = "ANNOTATION_NODES")]
        nodes: Option<usize>,
    },

    /// Learn tables, then list the properties matching a pattern
    Search {
        /// Table documents to learn from
        #[clap(long, required = true, num_args = 1..)]
        learn: Vec<PathBuf>,

        /// Regular expression over property URIs and labels
        #[clap(short, long)]
        pattern: String,

        /// Regex flags: any of i, m, s, x
        #[clap(long, default_value = "")]
        flags: String,

        /// Maximum number of properties
        #[clap(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Aggregation {
    /// Ascending mean distance
    Average,
    /// Descending number of matches
    Majority,
}

impl From<Aggregation> for AggregationKind {
    fn from(aggregation: Aggregation) -> Self {
        match aggregation {
            Aggregation::Average => AggregationKind::AverageDistance,
            Aggregation::Majority => AggregationKind::MajorityVote,
        }
    }
}

#[derive(Serialize)]
struct AnnotatedTable {
    input: String,
    annotations: BTreeMap<usize, Annotation>,
}

#[derive(Serialize)]
struct FoundProperty {
    id: String,
    uri: Option<String>,
    labels: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = CoreConfig::new();

    if let Some(config_path) = &args.config {
        config = CoreConfig::from_file(config_path)?;
    }

    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, config.log_level.as_str()),
    );

    let registry = GraphRegistry::new();
    registry.create(&args.graph)?;

    match args.command {
        Command::Annotate { learn, input, k, aggregation, nodes } => {
            // Override config with command-line arguments
            if let Some(k) = k {
                config.annotation.k = k;
            }
            if let Some(aggregation) = aggregation {
                config.annotation.aggregation = aggregation.into();
            }
            if let Some(nodes) = nodes {
                config.matcher.k = nodes;
            }

            learn_all(&config, &registry, &args.graph, &learn)?;

            let annotator = Annotator::new(&config)?;
            let mut results = Vec::with_capacity(input.len());
            for path in &input {
                let table = input::load_table(path)?;
                let annotations = annotator.annotate_graph(&registry, &args.graph, &table)?;
                results.push(AnnotatedTable {
                    input: path.display().to_string(),
                    annotations,
                });
            }

            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Search { learn, pattern, flags, limit } => {
            learn_all(&config, &registry, &args.graph, &learn)?;

            let found = registry.read(&args.graph, |graph| -> Result<Vec<FoundProperty>> {
                let properties = graph.search(&pattern, &flags, limit)?;
                Ok(properties
                    .into_iter()
                    .map(|property| FoundProperty {
                        id: property.id().to_string(),
                        uri: property.uri().map(str::to_string),
                        labels: property.labels().map(|l| l.text().to_string()).collect(),
                    })
                    .collect())
            })??;

            println!("{}", serde_json::to_string_pretty(&found)?);
        }
    }

    Ok(())
}

fn learn_all(config: &CoreConfig, registry: &GraphRegistry, graph: &str, paths: &[PathBuf]) -> Result<()> {
    let learner = Learner::from_config(config)?;

    for path in paths {
        let table = input::load_table(path)?;
        let report = learner.learn(registry, graph, &table)?;
        info!(
            "{}: learned {} columns, {} new properties",
            path.display(),
            report.columns.len(),
            report.created()
        );
    }

    let properties = registry.read(graph, |g| g.len())?;
    info!("Graph '{}' holds {} properties", graph, properties);
    Ok(())
}
