use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use royal_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

/// One inspectable setting: its dotted path in `royal.toml`, the env keys that
/// override it (first match wins), and the rendered effective value.
struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = match load_config_file_doc(config_file_path.as_deref()) {
        Ok(doc) => doc,
        Err(error) => return format!("config file unreadable: {error:#}"),
    };

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(&field, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }
    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let pricing = &config.pricing;
    vec![
        Field {
            key_path: "ai.api_key",
            env_keys: &["ROYAL_AI_API_KEY", "API_KEY"],
            value: redact(config.ai.credential().map(|key| key.expose_secret())),
        },
        Field {
            key_path: "ai.base_url",
            env_keys: &["ROYAL_AI_BASE_URL"],
            value: config.ai.base_url.clone(),
        },
        Field {
            key_path: "ai.model",
            env_keys: &["ROYAL_AI_MODEL"],
            value: config.ai.model.clone(),
        },
        Field {
            key_path: "leads.backend",
            env_keys: &["ROYAL_LEADS_BACKEND"],
            value: format!("{:?}", config.leads.backend).to_ascii_lowercase(),
        },
        Field {
            key_path: "leads.url",
            env_keys: &["ROYAL_LEADS_URL", "VITE_SUPABASE_URL"],
            value: config.leads.url.clone().unwrap_or_else(|| "<unset>".to_string()),
        },
        Field {
            key_path: "leads.anon_key",
            env_keys: &["ROYAL_LEADS_ANON_KEY", "VITE_SUPABASE_ANON_KEY"],
            value: redact(config.leads.anon_key.as_ref().map(|key| key.expose_secret())),
        },
        Field {
            key_path: "leads.table",
            env_keys: &["ROYAL_LEADS_TABLE"],
            value: config.leads.table.clone(),
        },
        Field {
            key_path: "leads.max_connections",
            env_keys: &["ROYAL_LEADS_MAX_CONNECTIONS"],
            value: config.leads.max_connections.to_string(),
        },
        Field {
            key_path: "pricing.hourly_rate",
            env_keys: &["ROYAL_PRICING_HOURLY_RATE"],
            value: pricing.hourly_rate.to_string(),
        },
        Field {
            key_path: "pricing.mic_fee",
            env_keys: &["ROYAL_PRICING_MIC_FEE"],
            value: pricing.mic_fee.to_string(),
        },
        Field {
            key_path: "pricing.lights_fee",
            env_keys: &["ROYAL_PRICING_LIGHTS_FEE"],
            value: pricing.lights_fee.to_string(),
        },
        Field {
            key_path: "pricing.transportation_estimate",
            env_keys: &["ROYAL_PRICING_TRANSPORTATION_ESTIMATE"],
            value: pricing.transportation_estimate.to_string(),
        },
        Field {
            key_path: "pricing.deposit_fraction",
            env_keys: &["ROYAL_PRICING_DEPOSIT_FRACTION"],
            value: pricing.deposit_fraction.to_string(),
        },
        Field {
            key_path: "pricing.overtime_rate",
            env_keys: &["ROYAL_PRICING_OVERTIME_RATE"],
            value: pricing.overtime_rate.to_string(),
        },
        Field {
            key_path: "payment.link_base",
            env_keys: &["ROYAL_PAYMENT_LINK_BASE"],
            value: config.payment.link_base.clone(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["ROYAL_LOGGING_LEVEL", "ROYAL_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["ROYAL_LOGGING_FORMAT", "ROYAL_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("royal.toml"), PathBuf::from("config/royal.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> anyhow::Result<Option<Value>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = raw
        .parse::<Value>()
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(doc))
}

fn field_source(field: &Field, doc: Option<&Value>, path: Option<&Path>) -> String {
    let set_env = field
        .env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = set_env {
        return format!("env ({env_key})");
    }

    if doc.is_some_and(|doc| contains_path(doc, field.key_path)) {
        let file_path = path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "config file".to_string());
        return format!("file ({file_path})");
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path
        .split('.')
        .try_fold(root, |current, key| current.get(key))
        .is_some()
}

fn redact(secret: Option<&str>) -> String {
    match secret.map(str::trim) {
        None | Some("") => "<unset>".to_string(),
        Some(value) if value.chars().count() > 8 => {
            let prefix: String = value.chars().take(4).collect();
            format!("{prefix}***")
        }
        Some(_) => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{contains_path, redact};

    #[test]
    fn redact_keeps_only_a_short_prefix() {
        assert_eq!(redact(None), "<unset>");
        assert_eq!(redact(Some("  ")), "<unset>");
        assert_eq!(redact(Some("short")), "<redacted>");
        assert_eq!(redact(Some("AIzaSyExampleKey")), "AIza***");
    }

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: toml::Value = "[leads]\nbackend = \"sqlite\"\n".parse().expect("toml");
        assert!(contains_path(&doc, "leads.backend"));
        assert!(!contains_path(&doc, "leads.url"));
        assert!(!contains_path(&doc, "ai.model"));
    }
}
