use chatsift::cli::{Cli, Commands, ConfigAction};
use chatsift::config::Config;
use chatsift::error::{ChatsiftError, Result};
use chatsift::{Message, RawSearchHit, ResultProcessor, Segmenter};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Segment { input, json } => {
            cmd_segment(cli.config, cli.profile, &input, json)?;
        }
        Commands::Rank {
            input,
            query,
            limit,
            json,
        } => {
            cmd_rank(cli.config, cli.profile, &input, &query, limit, json)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "chatsift=debug" } else { "chatsift=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_segment(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    input: &Path,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, profile)?;
    let segmenter = Segmenter::new(Arc::new(config))?;

    let messages: Vec<Message> = read_json(input)?;
    let groups = segmenter.segment_groups(&messages)?;

    if json {
        println!("{}", to_json(&groups)?);
        return Ok(());
    }

    for (group_id, segments) in &groups {
        println!("Group {} ({} segments)", group_id, segments.len());
        for segment in segments {
            println!(
                "  [{} - {}] {} messages, {} participants",
                segment.start_time.format("%Y-%m-%d %H:%M"),
                segment.end_time.format("%H:%M"),
                segment.message_count,
                segment.participant_count
            );
            println!("    Keywords: {}", segment.topic_keywords.join(", "));
            println!("    Summary:  {}", segment.content_summary);
        }
    }

    Ok(())
}

fn cmd_rank(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    input: &Path,
    query: &str,
    limit: usize,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, profile)?;
    let processor = ResultProcessor::new(Arc::new(config))?;

    let hits: Vec<RawSearchHit> = read_json(input)?;
    let mut results = processor.process(hits, query)?;
    results.truncate(limit);

    if json {
        println!("{}", to_json(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results for: {}", query);
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>3}. [{:.3}] #{} (distance {:.3}, keywords {:.2})",
            rank + 1,
            result.relevance_score,
            result.hit.id,
            result.hit.distance,
            result.keyword_score
        );
        println!("     {}", result.hit.preview(80));
    }

    Ok(())
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            let rendered = toml::to_string_pretty(&config)?;
            println!("{}", rendered);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ChatsiftError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::warn!(
            "Config file not found, using defaults. Run 'chatsift config init' to create one."
        );
        return Ok(Config::default());
    }

    if let Some(profile) = profile {
        Config::load_with_profile(&path, &profile)
    } else {
        Config::load(&path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ChatsiftError::Io {
        source: e,
        context: format!("Failed to read input file: {:?}", path),
    })?;

    serde_json::from_str(&content).map_err(|e| ChatsiftError::Json {
        source: e,
        context: format!("Failed to parse input file: {:?}", path),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ChatsiftError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })
}
