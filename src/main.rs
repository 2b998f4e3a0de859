//! Proofbot - Telegram spelling and punctuation assistant
//!
//! Corrects typed messages and text recognized on photos.

use anyhow::{Context, Result};
use clap::Parser;
use proofbot::checker::{self, languagetool_manager, LanguageToolClient};
use proofbot::config::{config_path, Config};
use proofbot::processor::Processor;
use proofbot::{bot, logging, ocr, preflight};
use std::io::Write;
use std::path::{Path, PathBuf};
use teloxide::prelude::*;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Telegram bot token (otherwise PROOFBOT_TOKEN, config, or prompt)
    #[arg(short, long)]
    token: Option<String>,

    /// Path to config.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// LanguageTool server URL
    #[arg(long)]
    languagetool_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run dependency checks and exit
    #[arg(long)]
    check: bool,

    /// Store the token in the config file
    #[arg(long)]
    save_token: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_file = args.config.clone().unwrap_or_else(config_path);
    let mut config = Config::load_from(&config_file)?;
    config.apply_env();
    if let Some(url) = &args.languagetool_url {
        config.languagetool_url = url.trim_end_matches('/').to_string();
    }

    // Setup logging
    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    logging::init_logger(logging::env_filter(&level), std::io::stdout)?;

    info!("🤖 Proofbot v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut languagetool_server = None;
    if config.languagetool_autostart {
        let client = LanguageToolClient::new(&config)?;
        if !client.health_check().await {
            match languagetool_manager::start_server(&config).await {
                Ok(child) => languagetool_server = Some(child),
                Err(e) => warn!("⚠️ Could not start LanguageTool: {:#}", e),
            }
        }
    }

    let reports = preflight::run_checks(&config).await;
    if args.check {
        if let Some(mut child) = languagetool_server {
            languagetool_manager::stop_server(&mut child);
        }
        if preflight::all_passed(&reports) {
            info!("✅ All dependencies found");
            return Ok(());
        }
        anyhow::bail!("Some dependency checks failed");
    }

    let result = run_bot(&args, &mut config, &config_file).await;

    if let Some(mut child) = languagetool_server {
        languagetool_manager::stop_server(&mut child);
    }
    result
}

async fn run_bot(args: &Args, config: &mut Config, config_file: &Path) -> Result<()> {
    let token = match args.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => token.to_string(),
        None if !config.bot_token.is_empty() => config.bot_token.clone(),
        None => prompt_token().await?,
    };
    if token.is_empty() {
        anyhow::bail!("No bot token provided");
    }

    if args.save_token {
        config.bot_token = token.clone();
        config.save_to(config_file)?;
        info!("💾 Token saved to {}", config_file.display());
    }

    let bot = Bot::new(token);
    let me = bot
        .get_me()
        .await
        .context("Telegram rejected the bot token")?;
    info!("✅ Bot @{} authorized", me.username());

    let checker = checker::create_checker(config)?;
    let ocr = ocr::create_engine(config);
    let processor = Processor::from_config(config, checker, ocr);

    bot::run(bot, processor).await
}

async fn prompt_token() -> Result<String> {
    tokio::task::spawn_blocking(|| -> Result<String> {
        print!("🤖 Enter your bot token (get one from @BotFather): ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    })
    .await?
}
