use clap::Parser;
use imgsearch::{
    BufferScreen, FileLoader, ImageResizer, ImageSearcher, LoadOptions, Match, SearchConfig,
    SearchRect, SearchRequest, Strategy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "imgsearch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum OutputFormat {
    #[default]
    Wire,
    Json,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum StrategyConfig {
    Auto,
    Scalar,
    Vector,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RectJson {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchConfigJson {
    tolerance: i32,
    /// `"0xRRGGBB"` or `null` for no transparency key.
    transparent: Option<String>,
    max_results: usize,
    center: bool,
    debug: bool,
    scale_min: f32,
    scale_max: f32,
    scale_step: f32,
    find_all: bool,
    max_output_len: usize,
    parallel: bool,
    strategy: StrategyConfig,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = SearchConfig::default();
        Self {
            tolerance: cfg.tolerance,
            transparent: None,
            max_results: cfg.max_results,
            center: cfg.center,
            debug: cfg.debug,
            scale_min: cfg.scale_min,
            scale_max: cfg.scale_max,
            scale_step: cfg.scale_step,
            find_all: cfg.find_all,
            max_output_len: cfg.max_output_len,
            parallel: cfg.parallel,
            strategy: StrategyConfig::Auto,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoadJson {
    width: i32,
    height: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    screen_path: String,
    references: Vec<String>,
    output_path: Option<String>,
    output: OutputFormat,
    rect: RectJson,
    load: LoadJson,
    search: SearchConfigJson,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl From<Match> for MatchRecord {
    fn from(value: Match) -> Self {
        Self {
            x: value.x,
            y: value.y,
            w: value.w,
            h: value.h,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    matches: Vec<MatchRecord>,
    skipped: usize,
    vector: bool,
}

fn parse_color(text: &str) -> Result<Option<u32>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("none") || trimmed.is_empty() {
        return Ok(None);
    }
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);
    let value = u32::from_str_radix(hex, 16)
        .map_err(|err| format!("invalid transparent colour {text:?}: {err}"))?;
    if value > 0xFF_FFFF {
        return Err(format!("transparent colour {text:?} must be 0xRRGGBB").into());
    }
    Ok(Some(value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("imgsearch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.screen_path.is_empty() || config.references.is_empty() {
        return Err("screen_path and references must be set in the config".into());
    }

    let screen = FileLoader::new().load_path(&config.screen_path)?;
    let loader = FileLoader::with_options(LoadOptions {
        width: config.load.width,
        height: config.load.height,
    });
    let mut searcher = ImageSearcher::new(BufferScreen::new(screen), loader)
        .with_resizer(ImageResizer);
    searcher = match config.search.strategy {
        StrategyConfig::Auto => searcher,
        StrategyConfig::Scalar => searcher.with_strategy(Strategy::Scalar),
        StrategyConfig::Vector => searcher.with_strategy(Strategy::Vector),
    };

    let search = &config.search;
    let transparent = match &search.transparent {
        Some(text) => parse_color(text)?,
        None => None,
    };
    let request = SearchRequest::new(config.references.join("|"))
        .with_rect(SearchRect::new(
            config.rect.left,
            config.rect.top,
            config.rect.right,
            config.rect.bottom,
        ))
        .with_config(SearchConfig {
            tolerance: search.tolerance,
            transparent,
            max_results: search.max_results,
            center: search.center,
            debug: search.debug,
            scale_min: search.scale_min,
            scale_max: search.scale_max,
            scale_step: search.scale_step,
            find_all: search.find_all,
            max_output_len: search.max_output_len,
            parallel: search.parallel,
        });

    let text = match config.output {
        OutputFormat::Wire => searcher.search(&request),
        OutputFormat::Json => {
            let outcome = searcher.search_outcome(&request)?;
            let mut matches = outcome.matches;
            if search.max_results > 0 {
                matches.truncate(search.max_results);
            }
            let matches: Vec<MatchRecord> = matches
                .into_iter()
                .map(|m| if search.center { m.centered() } else { m })
                .map(MatchRecord::from)
                .collect();
            let output = Output {
                count: matches.len(),
                matches,
                skipped: outcome.skipped,
                vector: searcher.strategy().is_vector(),
            };
            serde_json::to_string_pretty(&output)?
        }
    };

    match config.output_path {
        Some(path) => fs::write(path, text)?,
        None => println!("{text}"),
    }

    Ok(())
}
