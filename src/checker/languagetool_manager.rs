//! LanguageTool Server Manager
//!
//! Manages the lifecycle of a local `languagetool-server.jar` process.

use super::LanguageToolClient;
use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::{error, info, warn};

const SERVER_CLASS: &str = "org.languagetool.server.HTTPServer";
const READY_POLL_INTERVAL: Duration = Duration::from_millis(500);
const READY_POLL_ATTEMPTS: usize = 60;

/// Port of the configured LanguageTool URL (explicit or scheme default)
pub fn server_port(url: &str) -> Option<u16> {
    reqwest::Url::parse(url).ok()?.port_or_known_default()
}

/// True when the configured URL points at this machine
pub fn is_local(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "::1" | "[::1]")))
        .unwrap_or(false)
}

/// Start a local LanguageTool server and wait until it answers
pub async fn start_server(config: &Config) -> Result<Child> {
    let client = LanguageToolClient::new(config)?;
    if client.health_check().await {
        warn!("LanguageTool server already running at {}", client.url());
        return Err(anyhow::anyhow!("Server already running"));
    }

    if !is_local(&config.languagetool_url) {
        return Err(anyhow::anyhow!(
            "Refusing to start a server for non-local URL {}",
            config.languagetool_url
        ));
    }

    let port = server_port(&config.languagetool_url)
        .ok_or_else(|| anyhow::anyhow!("No port in {}", config.languagetool_url))?;

    let jar = Path::new(&config.languagetool_jar);
    if !jar.exists() {
        return Err(anyhow::anyhow!(
            "LanguageTool jar not found at {}",
            jar.display()
        ));
    }

    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("proofbot/logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create logs dir")?;
    let log_file = std::fs::File::create(log_dir.join("languagetool_server.log"))
        .context("Failed to create log file")?;
    let stderr_log = log_file.try_clone().context("Failed to clone log handle")?;

    info!("🚀 Starting LanguageTool server...");
    info!("   Jar: {}", jar.display());
    info!("   Port: {}", port);

    let mut child = Command::new("java")
        .arg("-cp")
        .arg(jar)
        .arg(SERVER_CLASS)
        .arg("--port")
        .arg(port.to_string())
        .stdout(Stdio::from(log_file))
        .stderr(Stdio::from(stderr_log))
        .spawn()
        .context("Failed to spawn java. Is a JRE installed?")?;

    let ready = Retry::spawn(
        FixedInterval::new(READY_POLL_INTERVAL).take(READY_POLL_ATTEMPTS),
        || async {
            if client.health_check().await {
                Ok(())
            } else {
                Err(())
            }
        },
    )
    .await;

    if let Ok(Some(status)) = child.try_wait() {
        error!("LanguageTool server exited with status: {}", status);
        return Err(anyhow::anyhow!("Server process exited prematurely"));
    }

    match ready {
        Ok(()) => {
            info!(
                "✅ LanguageTool server started successfully (PID: {})",
                child.id()
            );
            Ok(child)
        }
        Err(()) => {
            stop_server(&mut child);
            Err(anyhow::anyhow!("Timed out waiting for LanguageTool to listen"))
        }
    }
}

/// Stop the server process
pub fn stop_server(child: &mut Child) {
    info!("🛑 Stopping LanguageTool server (PID: {})...", child.id());
    let _ = child.kill();
    let _ = child.wait();
}
