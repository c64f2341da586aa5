use royal_core::config::{AppConfig, LeadBackend, LoadOptions};
use royal_db::connect_with_settings;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn new(name: &'static str, status: CheckStatus, details: impl Into<String>) -> Self {
        Self { name, status, details: details.into() }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let checks = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            DoctorCheck::new(
                "config_validation",
                CheckStatus::Pass,
                "configuration loaded and validated",
            ),
            check_ai_credential(&config),
            check_lead_store(&config),
        ],
        Err(error) => {
            let skipped = "skipped because configuration did not load";
            vec![
                DoctorCheck::new("config_validation", CheckStatus::Fail, error.to_string()),
                DoctorCheck::new("ai_credential", CheckStatus::Skipped, skipped),
                DoctorCheck::new("lead_store", CheckStatus::Skipped, skipped),
            ]
        }
    };

    let any_failed = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let (overall_status, summary) = if any_failed {
        (CheckStatus::Fail, "doctor: one or more readiness checks failed")
    } else {
        (CheckStatus::Pass, "doctor: all readiness checks passed")
    };

    DoctorReport { overall_status, summary: summary.to_string(), checks }
}

// Contract drafting and playlist generation both fail without a key.
fn check_ai_credential(config: &AppConfig) -> DoctorCheck {
    match config.ai.credential() {
        Some(_) => DoctorCheck::new(
            "ai_credential",
            CheckStatus::Pass,
            format!("key present for model `{}`", config.ai.model),
        ),
        None => DoctorCheck::new(
            "ai_credential",
            CheckStatus::Fail,
            "no AI key set (ROYAL_AI_API_KEY); contract and playlist requests will fail",
        ),
    }
}

fn check_lead_store(config: &AppConfig) -> DoctorCheck {
    let leads = &config.leads;
    match leads.backend {
        LeadBackend::Disabled => {
            DoctorCheck::new("lead_store", CheckStatus::Skipped, "lead capture is disabled")
        }
        LeadBackend::Hosted if leads.hosted_ready() => DoctorCheck::new(
            "lead_store",
            CheckStatus::Pass,
            format!("hosted table `{}` configured", leads.table),
        ),
        LeadBackend::Hosted => DoctorCheck::new(
            "lead_store",
            CheckStatus::Fail,
            "hosted backend needs both leads.url and leads.anon_key",
        ),
        LeadBackend::Sqlite => check_sqlite_connectivity(config),
    }
}

fn check_sqlite_connectivity(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck::new(
                "lead_store",
                CheckStatus::Fail,
                format!("failed to initialize async runtime: {error}"),
            );
        }
    };

    let url = config.leads.url.clone().unwrap_or_default();
    let result = runtime.block_on(async {
        let pool = connect_with_settings(&url, config.leads.max_connections, 30)
            .await
            .map_err(|error| format!("failed to connect to lead database: {error}"))?;
        pool.close().await;
        Ok::<(), String>(())
    });

    match result {
        Ok(()) => {
            DoctorCheck::new("lead_store", CheckStatus::Pass, format!("connected using `{url}`"))
        }
        Err(error) => DoctorCheck::new("lead_store", CheckStatus::Fail, error),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
