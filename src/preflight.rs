//! Startup dependency checks
//!
//! Verifies the external tools the bot relies on before it starts polling.

use crate::checker::LanguageToolClient;
use crate::config::Config;
use crate::ocr::tesseract;
use std::fmt;
use tracing::{error, info};

/// Outcome of a single dependency check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

impl CheckReport {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            ok: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            ok: false,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.ok { "✅" } else { "❌" };
        write!(f, "{} {}: {}", mark, self.name, self.detail)
    }
}

/// Run every check and log the results
pub async fn run_checks(config: &Config) -> Vec<CheckReport> {
    info!("🔍 Checking dependencies...");

    let mut reports = check_tesseract(config);
    reports.push(check_languagetool(config).await);

    for report in &reports {
        if report.ok {
            info!("{}", report);
        } else {
            error!("{}", report);
        }
    }
    reports
}

pub fn all_passed(reports: &[CheckReport]) -> bool {
    reports.iter().all(|r| r.ok)
}

fn check_tesseract(config: &Config) -> Vec<CheckReport> {
    let cmd = &config.tesseract_cmd;

    let version = match tesseract::version(cmd) {
        Ok(v) => v,
        Err(e) => {
            return vec![CheckReport::fail(
                "tesseract",
                format!(
                    "{:#}. Install it, e.g. `sudo apt-get install tesseract-ocr tesseract-ocr-rus` \
                     or `brew install tesseract tesseract-lang`",
                    e
                ),
            )]
        }
    };

    let mut reports = vec![CheckReport::pass("tesseract", version)];
    reports.push(match tesseract::list_languages(cmd) {
        Ok(langs) => language_report(&config.ocr_language, &langs),
        Err(e) => CheckReport::fail("ocr language", format!("{:#}", e)),
    });
    reports
}

fn language_report(wanted: &str, installed: &[String]) -> CheckReport {
    // `rus+eng` needs every part installed
    let missing: Vec<&str> = wanted
        .split('+')
        .filter(|lang| !installed.iter().any(|l| l == lang))
        .collect();

    if missing.is_empty() {
        CheckReport::pass("ocr language", format!("'{}' installed", wanted))
    } else {
        CheckReport::fail(
            "ocr language",
            format!("missing traineddata for: {}", missing.join(", ")),
        )
    }
}

async fn check_languagetool(config: &Config) -> CheckReport {
    let client = match LanguageToolClient::new(config) {
        Ok(c) => c,
        Err(e) => return CheckReport::fail("languagetool", format!("{:#}", e)),
    };

    if client.health_check().await {
        CheckReport::pass("languagetool", format!("reachable at {}", client.url()))
    } else {
        CheckReport::fail(
            "languagetool",
            format!(
                "no server at {} (start one or set languagetool_autostart)",
                client.url()
            ),
        )
    }
}
