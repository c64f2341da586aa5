use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payment::DEFAULT_LINK_BASE;
use crate::pricing::PricingSchedule;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub leads: LeadsConfig,
    pub pricing: PricingSchedule,
    pub payment: PaymentConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct LeadsConfig {
    pub backend: LeadBackend,
    pub url: Option<String>,
    pub anon_key: Option<SecretString>,
    pub table: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub link_base: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadBackend {
    Hosted,
    Sqlite,
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub ai_api_key: Option<String>,
    pub ai_base_url: Option<String>,
    pub ai_model: Option<String>,
    pub leads_backend: Option<LeadBackend>,
    pub leads_url: Option<String>,
    pub leads_anon_key: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                model: "gemini-2.5-flash".to_string(),
            },
            leads: LeadsConfig {
                backend: LeadBackend::Hosted,
                url: None,
                anon_key: None,
                table: "leads".to_string(),
                max_connections: 5,
            },
            pricing: PricingSchedule::default(),
            payment: PaymentConfig { link_base: DEFAULT_LINK_BASE.to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl FromStr for LeadBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hosted" | "supabase" => Ok(Self::Hosted),
            "sqlite" => Ok(Self::Sqlite),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(ConfigError::Validation(format!(
                "unsupported leads backend `{other}` (expected hosted|sqlite|disabled)"
            ))),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AiConfig {
    /// The credential, if one is set and non-blank.
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key.as_ref().filter(|key| !key.expose_secret().trim().is_empty())
    }
}

impl LeadsConfig {
    /// Whether the hosted backend has both its url and key.
    pub fn hosted_ready(&self) -> bool {
        let has_url = self.url.as_deref().is_some_and(|url| !url.trim().is_empty());
        let has_key =
            self.anon_key.as_ref().is_some_and(|key| !key.expose_secret().trim().is_empty());
        has_url && has_key
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("royal.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(ai) = patch.ai {
            if let Some(ai_api_key_value) = ai.api_key {
                self.ai.api_key = Some(secret_value(ai_api_key_value));
            }
            if let Some(base_url) = ai.base_url {
                self.ai.base_url = base_url;
            }
            if let Some(model) = ai.model {
                self.ai.model = model;
            }
        }

        if let Some(leads) = patch.leads {
            if let Some(backend) = leads.backend {
                self.leads.backend = backend;
            }
            if let Some(url) = leads.url {
                self.leads.url = Some(url);
            }
            if let Some(leads_anon_key_value) = leads.anon_key {
                self.leads.anon_key = Some(secret_value(leads_anon_key_value));
            }
            if let Some(table) = leads.table {
                self.leads.table = table;
            }
            if let Some(max_connections) = leads.max_connections {
                self.leads.max_connections = max_connections;
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(hourly_rate) = pricing.hourly_rate {
                self.pricing.hourly_rate = hourly_rate;
            }
            if let Some(mic_fee) = pricing.mic_fee {
                self.pricing.mic_fee = mic_fee;
            }
            if let Some(lights_fee) = pricing.lights_fee {
                self.pricing.lights_fee = lights_fee;
            }
            if let Some(transportation_estimate) = pricing.transportation_estimate {
                self.pricing.transportation_estimate = transportation_estimate;
            }
            if let Some(deposit_fraction) = pricing.deposit_fraction {
                self.pricing.deposit_fraction = deposit_fraction;
            }
            if let Some(overtime_rate) = pricing.overtime_rate {
                self.pricing.overtime_rate = overtime_rate;
            }
        }

        if let Some(payment) = patch.payment {
            if let Some(link_base) = payment.link_base {
                self.payment.link_base = link_base;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ROYAL_AI_API_KEY").or_else(|| read_env("API_KEY")) {
            self.ai.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("ROYAL_AI_BASE_URL") {
            self.ai.base_url = value;
        }
        if let Some(value) = read_env("ROYAL_AI_MODEL") {
            self.ai.model = value;
        }

        if let Some(value) = read_env("ROYAL_LEADS_BACKEND") {
            self.leads.backend = value.parse()?;
        }
        if let Some(value) = read_env("ROYAL_LEADS_URL").or_else(|| read_env("VITE_SUPABASE_URL")) {
            self.leads.url = Some(value);
        }
        let anon_key =
            read_env("ROYAL_LEADS_ANON_KEY").or_else(|| read_env("VITE_SUPABASE_ANON_KEY"));
        if let Some(value) = anon_key {
            self.leads.anon_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("ROYAL_LEADS_TABLE") {
            self.leads.table = value;
        }
        if let Some(value) = read_env("ROYAL_LEADS_MAX_CONNECTIONS") {
            self.leads.max_connections = parse_u32("ROYAL_LEADS_MAX_CONNECTIONS", &value)?;
        }

        if let Some(value) = read_env("ROYAL_PRICING_HOURLY_RATE") {
            self.pricing.hourly_rate = parse_decimal("ROYAL_PRICING_HOURLY_RATE", &value)?;
        }
        if let Some(value) = read_env("ROYAL_PRICING_MIC_FEE") {
            self.pricing.mic_fee = parse_decimal("ROYAL_PRICING_MIC_FEE", &value)?;
        }
        if let Some(value) = read_env("ROYAL_PRICING_LIGHTS_FEE") {
            self.pricing.lights_fee = parse_decimal("ROYAL_PRICING_LIGHTS_FEE", &value)?;
        }
        if let Some(value) = read_env("ROYAL_PRICING_TRANSPORTATION_ESTIMATE") {
            self.pricing.transportation_estimate =
                parse_decimal("ROYAL_PRICING_TRANSPORTATION_ESTIMATE", &value)?;
        }
        if let Some(value) = read_env("ROYAL_PRICING_DEPOSIT_FRACTION") {
            self.pricing.deposit_fraction =
                parse_decimal("ROYAL_PRICING_DEPOSIT_FRACTION", &value)?;
        }
        if let Some(value) = read_env("ROYAL_PRICING_OVERTIME_RATE") {
            self.pricing.overtime_rate = parse_decimal("ROYAL_PRICING_OVERTIME_RATE", &value)?;
        }

        if let Some(value) = read_env("ROYAL_PAYMENT_LINK_BASE") {
            self.payment.link_base = value;
        }

        let log_level = read_env("ROYAL_LOGGING_LEVEL").or_else(|| read_env("ROYAL_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("ROYAL_LOGGING_FORMAT").or_else(|| read_env("ROYAL_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(ai_api_key) = overrides.ai_api_key {
            self.ai.api_key = Some(secret_value(ai_api_key));
        }
        if let Some(ai_base_url) = overrides.ai_base_url {
            self.ai.base_url = ai_base_url;
        }
        if let Some(ai_model) = overrides.ai_model {
            self.ai.model = ai_model;
        }
        if let Some(leads_backend) = overrides.leads_backend {
            self.leads.backend = leads_backend;
        }
        if let Some(leads_url) = overrides.leads_url {
            self.leads.url = Some(leads_url);
        }
        if let Some(leads_anon_key) = overrides.leads_anon_key {
            self.leads.anon_key = Some(secret_value(leads_anon_key));
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ai(&self.ai)?;
        validate_leads(&self.leads)?;
        validate_pricing(&self.pricing)?;
        validate_payment(&self.payment)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("royal.toml"), PathBuf::from("config/royal.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

// The AI key is deliberately absent from validation: a missing key only fails
// the call that needs it.
fn validate_ai(ai: &AiConfig) -> Result<(), ConfigError> {
    if !is_http_url(ai.base_url.trim()) {
        return Err(ConfigError::Validation(
            "ai.base_url must start with http:// or https://".to_string(),
        ));
    }
    if ai.model.trim().is_empty() {
        return Err(ConfigError::Validation("ai.model must not be empty".to_string()));
    }
    Ok(())
}

fn validate_leads(leads: &LeadsConfig) -> Result<(), ConfigError> {
    if leads.table.trim().is_empty() {
        return Err(ConfigError::Validation("leads.table must not be empty".to_string()));
    }

    match leads.backend {
        LeadBackend::Hosted => {
            if let Some(url) = leads.url.as_deref().filter(|url| !url.trim().is_empty()) {
                if !is_http_url(url.trim()) {
                    return Err(ConfigError::Validation(
                        "leads.url must start with http:// or https:// for the hosted backend"
                            .to_string(),
                    ));
                }
            }
        }
        LeadBackend::Sqlite => {
            let url = leads.url.as_deref().map(str::trim).unwrap_or_default();
            let sqlite_url =
                url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
            if !sqlite_url {
                return Err(ConfigError::Validation(
                    "leads.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`) \
                     for the sqlite backend"
                        .to_string(),
                ));
            }
            if leads.max_connections == 0 {
                return Err(ConfigError::Validation(
                    "leads.max_connections must be greater than zero".to_string(),
                ));
            }
        }
        LeadBackend::Disabled => {}
    }

    Ok(())
}

/// Upper bound for any configured fee or rate, in dollars.
pub const MAX_PRICING_AMOUNT: u32 = 1_000_000;

fn validate_pricing(pricing: &PricingSchedule) -> Result<(), ConfigError> {
    let amounts = [
        ("pricing.hourly_rate", pricing.hourly_rate),
        ("pricing.mic_fee", pricing.mic_fee),
        ("pricing.lights_fee", pricing.lights_fee),
        ("pricing.transportation_estimate", pricing.transportation_estimate),
        ("pricing.overtime_rate", pricing.overtime_rate),
    ];
    if let Some((name, _)) = amounts.iter().find(|(_, amount)| amount.is_sign_negative()) {
        return Err(ConfigError::Validation(format!("{name} must not be negative")));
    }
    let ceiling = Decimal::from(MAX_PRICING_AMOUNT);
    if let Some((name, _)) = amounts.iter().find(|(_, amount)| *amount > ceiling) {
        return Err(ConfigError::Validation(format!(
            "{name} must not exceed {MAX_PRICING_AMOUNT}"
        )));
    }

    if pricing.deposit_fraction <= Decimal::ZERO || pricing.deposit_fraction > Decimal::ONE {
        return Err(ConfigError::Validation(
            "pricing.deposit_fraction must be in range (0, 1]".to_string(),
        ));
    }

    Ok(())
}

fn validate_payment(payment: &PaymentConfig) -> Result<(), ConfigError> {
    if !is_http_url(payment.link_base.trim()) {
        return Err(ConfigError::Validation(
            "payment.link_base must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    ai: Option<AiPatch>,
    leads: Option<LeadsPatch>,
    pricing: Option<PricingPatch>,
    payment: Option<PaymentPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct AiPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LeadsPatch {
    backend: Option<LeadBackend>,
    url: Option<String>,
    anon_key: Option<String>,
    table: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    hourly_rate: Option<Decimal>,
    mic_fee: Option<Decimal>,
    lights_fee: Option<Decimal>,
    transportation_estimate: Option<Decimal>,
    deposit_fraction: Option<Decimal>,
    overtime_rate: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct PaymentPatch {
    link_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
