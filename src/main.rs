use std::fs;
use std::path::PathBuf;

use clap::Parser;
use mailbrief::{Archive, ArchiveError, Config, ConfigError};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailbrief", version)]
#[command(about = "Render generated news briefs as themed HTML email documents")]
struct Cli {
    /// Input text file (a JSON archive with --from-archive)
    input: PathBuf,

    /// Output HTML file (defaults to input name with .html extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Theme name, e.g. `newsletter` or `radar`
    #[arg(short, long, env = "MAILBRIEF_THEME")]
    theme: Option<String>,

    /// Configuration file layered over the built-in themes
    #[arg(short, long, env = "MAILBRIEF_CONFIG")]
    config: Option<PathBuf>,

    /// Read INPUT as a JSON archive and render its content
    #[arg(long)]
    from_archive: bool,

    /// Also save the input text as a JSON archive
    #[arg(long, value_name = "PATH")]
    archive: Option<PathBuf>,

    /// Write only the content fragment, without the document template
    #[arg(long)]
    fragment: bool,

    /// Enable info-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Archive(#[from] ArchiveError),

    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => println!("Created {}", output.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf, CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };
    if let Some(theme) = cli.theme {
        config.render.theme = theme;
    }
    // Fail on an unknown theme before touching any files
    let theme = config.default_theme()?;

    let text = if cli.from_archive {
        Archive::load(&cli.input)?.content
    } else {
        fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
            path: cli.input.clone(),
            source,
        })?
    };

    if let Some(path) = &cli.archive {
        Archive::new(theme.title.as_str(), text.as_str()).save(path)?;
    }

    let fragment = mailbrief::render_fragment_with_config(&text, &config.render);
    let html = if cli.fragment {
        fragment
    } else {
        mailbrief::build_document(&fragment, theme)
    };

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("html"));

    fs::write(&output, &html).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), bytes = html.len(), theme = %config.render.theme, "wrote document");

    Ok(output)
}
