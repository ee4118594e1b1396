mod output;
mod setup;
mod terminal_output;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use finscope_agent::EXAMPLE_ANALYSIS;
use finscope_config::{
    config_dir, config_file_path, load_and_prepare, redact, write_config, FinscopeConfig,
};
use finscope_gateway::{start_server, GatewayState};
use finscope_logging::init_logger;
use finscope_markdown::format_analysis;
use finscope_media::{detect_mime_type, MediaPayload};

use output::{render, OutputFormat};
use terminal_output::{note, Note};

#[derive(Parser)]
#[command(name = "finscope")]
#[command(about = "Finscope: identify fish species from a photo")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.finscope/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Identify the fish in a local image
    Analyze {
        file: PathBuf,
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Print the bundled sample analysis (no network)
    Example {
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Query a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets redacted
    Show,
    /// Write a config file populated with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    if let Commands::Config {
        action: Some(ConfigAction::Init { force }),
    } = &cli.command
    {
        return init_config(&config_path, *force).await;
    }

    let (config, report) = load_and_prepare(&config_path).await?;
    let settings = config.settings();
    let serving = matches!(cli.command, Commands::Serve { .. });
    init_logger(&setup::log_options(&settings, serving));
    info!(path = %config_path.display(), "Loaded config");
    report.log();

    match cli.command {
        Commands::Serve { port, bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind_address.clone());
            let port = port.unwrap_or(settings.port);
            let addr: SocketAddr = format!("{bind}:{port}")
                .parse()
                .with_context(|| format!("invalid bind address {bind}:{port}"))?;

            info!(
                %addr,
                provider = ?settings.vision.provider,
                model = %settings.vision.model,
                config = %config_path.display(),
                "Starting Finscope"
            );
            let analyzer = setup::build_analyzer(&settings)?;
            start_server(addr, GatewayState::new(analyzer)).await?;
        }
        Commands::Analyze { file, format } => {
            let analyzer = setup::build_analyzer(&settings)?;
            let payload = read_payload(&file).await?;

            let image = match analyzer.policy().accept(&payload) {
                Ok(image) => image,
                Err(e) => {
                    note(Note::Error, &e.to_string());
                    std::process::exit(1);
                }
            };

            note(Note::Info, &format!(
                "Analyzing {} with {} ({})",
                file.display(),
                analyzer.provider(),
                settings.vision.model
            ));
            match analyzer.analyze_image(&image).await {
                Ok(blocks) => {
                    print!("{}", render(&blocks, format.unwrap_or_else(OutputFormat::detect))?);
                }
                Err(e) => {
                    note(Note::Error, &e.to_string());
                    std::process::exit(1);
                }
            }
        }
        Commands::Example { format } => {
            let blocks = format_analysis(EXAMPLE_ANALYSIS);
            print!("{}", render(&blocks, format.unwrap_or_else(OutputFormat::detect))?);
        }
        Commands::Config { .. } => {
            show_config(&config, &config_path)?;
        }
        Commands::Status { port } => {
            let port = port.unwrap_or(settings.port);
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{port}/api/health"))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    note(Note::Warn, &format!("Finscope is not running on port {port}"));
                }
            }
        }
    }

    Ok(())
}

async fn read_payload(file: &Path) -> Result<MediaPayload> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let source = file.display().to_string();
    Ok(MediaPayload::new(source, detect_mime_type(file), data))
}

fn show_config(config: &FinscopeConfig, path: &Path) -> Result<()> {
    let value = serde_json::to_value(config)?;
    let yaml = serde_yaml::to_string(&redact(&value))?;
    note(Note::Info, &format!("Effective config ({})", path.display()));
    print!("{yaml}");
    Ok(())
}

async fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        note(Note::Warn, &format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
        return Ok(());
    }
    let config = finscope_config::apply_all_defaults(FinscopeConfig::default());
    write_config(&config, path).await?;
    note(Note::Success, &format!("Wrote {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_format() {
        let cli = Cli::try_parse_from(["finscope", "analyze", "reef.jpg", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Analyze { file, format } => {
                assert_eq!(file, PathBuf::from("reef.jpg"));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["finscope", "serve", "--port", "9000", "--config", "/tmp/f.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/f.yaml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), .. }));
    }

    #[test]
    fn bare_config_shows() {
        let cli = Cli::try_parse_from(["finscope", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { action: None }));
    }

    #[tokio::test]
    async fn read_payload_detects_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reef.PNG");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        let payload = read_payload(&path).await.unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data.len(), 3);
    }

    #[tokio::test]
    async fn init_config_does_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  port: 1234\n").unwrap();
        init_config(&path, false).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("1234"));

        init_config(&path, true).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("8080"));
    }
}
