//! Tesseract OCR backend calling a local binary

use super::OcrEngine;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            language: config.ocr_language.clone(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        info!("📸 Tesseract recognizing {} byte image", image.len());

        if image.is_empty() {
            return Err(anyhow::anyhow!("Empty image"));
        }

        let command = self.command.clone();
        let language = self.language.clone();
        let image = image.to_vec();

        // Subprocess I/O blocks; keep it off the async workers
        let text = tokio::task::spawn_blocking(move || -> Result<String> {
            let mut child = Command::new(&command)
                .args(["stdin", "stdout", "-l", language.as_str()])
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| {
                    error!("❌ Failed to spawn {}: {}", command, e);
                    anyhow::anyhow!("Failed to spawn {}: {}", command, e)
                })?;

            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(&image).and_then(|()| stdin.flush()) {
                    // Tesseract may exit before reading everything
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(anyhow::anyhow!("Failed to send image to {}: {}", command, e));
                }
            }

            let output = child.wait_with_output()?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(anyhow::anyhow!(
                    "Tesseract failed with status {}: {}",
                    output.status,
                    stderr.trim()
                ));
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))??;

        debug!("📝 Tesseract output: {:?}", text);
        Ok(text)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Version line reported by `tesseract --version`
pub fn version(command: &str) -> Result<String> {
    let output = Command::new(command)
        .arg("--version")
        .output()
        .with_context(|| format!("Failed to run {}", command))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("{} --version exited with {}", command, output.status));
    }

    // Older releases print the version on stderr
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("{} printed no version", command))
}

/// Languages installed for `tesseract` (`--list-langs`)
pub fn list_languages(command: &str) -> Result<Vec<String>> {
    let output = Command::new(command)
        .arg("--list-langs")
        .output()
        .with_context(|| format!("Failed to run {}", command))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("{} --list-langs exited with {}", command, output.status));
    }

    Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}
