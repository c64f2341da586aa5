use std::env;
use std::net::SocketAddr;
use std::sync::{Mutex, OnceLock};

use axum::routing::post;
use axum::{Json, Router};
use royal_cli::commands::book::BookArgs;
use royal_cli::commands::join::JoinArgs;
use royal_cli::commands::playlist::PlaylistArgs;
use royal_cli::commands::quote::QuoteArgs;
use royal_cli::commands::{book, config, doctor, join, migrate, playlist, quote};
use royal_core::domain::booking::EventType;
use serde_json::{json, Value};

#[test]
fn quote_prices_default_evening_without_credentials() {
    with_env(&[], || {
        let args = QuoteArgs {
            start: "19:00".to_string(),
            end: "23:00".to_string(),
            mics: false,
            lights: false,
        };
        let result = quote::run(&args);
        assert_eq!(result.exit_code, 0, "quote needs no credentials");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "quote");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "total $660.00 (deposit $330.00)");
        assert_eq!(payload["data"]["lines"].as_array().map(Vec::len), Some(4));
    });
}

#[test]
fn quote_honors_pricing_overrides_from_env() {
    with_env(&[("ROYAL_PRICING_HOURLY_RATE", "200")], || {
        let args = QuoteArgs {
            start: "22:00".to_string(),
            end: "01:00".to_string(),
            mics: true,
            lights: true,
        };
        let result = quote::run(&args);
        let payload = parse_payload(&result.output);

        // 3h * 200 + 50 + 200 + 60
        assert_eq!(payload["message"], "total $910.00 (deposit $455.00)");
    });
}

#[test]
fn quote_reports_invalid_config_as_validation_failure() {
    with_env(&[("ROYAL_PRICING_DEPOSIT_FRACTION", "1.5")], || {
        let result = quote::run(&quote_args());
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn book_without_ai_key_fails_as_configuration_missing() {
    with_env(&[], || {
        let result = book::run(&book_args());
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "book");
        assert_eq!(payload["error_class"], "configuration_missing");
        assert!(payload["data"]["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
    });
}

#[test]
fn book_drafts_and_confirms_against_fake_endpoint() {
    let agreement = "SERVICE AGREEMENT\nTotal: $660.00\nDeposit due: $330.00";
    let addr = spawn_fake_generator(agreement.to_string());
    let base_url = format!("http://{addr}");

    with_env(&[("ROYAL_AI_API_KEY", "test-key"), ("ROYAL_AI_BASE_URL", &base_url)], || {
        let mut args = book_args();
        args.payment_handle = "royalevents".to_string();
        args.confirm = true;

        let result = book::run(&args);
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["contract"], agreement);
        assert_eq!(payload["data"]["payment_link"], "https://paypal.me/royalevents/330.00");
    });
}

#[test]
fn playlist_parses_songs_from_fake_endpoint() {
    let songs: Vec<Value> = (1..=10)
        .map(|n| json!({ "title": format!("Song {n}"), "artist": format!("Artist {n}") }))
        .collect();
    let addr = spawn_fake_generator(json!({ "songs": songs }).to_string());
    let base_url = format!("http://{addr}");

    with_env(&[("ROYAL_AI_API_KEY", "test-key"), ("ROYAL_AI_BASE_URL", &base_url)], || {
        let result = playlist::run(&playlist_args(10));
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["songs"].as_array().map(Vec::len), Some(10));
        let text = payload["data"]["text"].as_str().unwrap_or_default();
        assert!(text.starts_with("1. Song 1 - Artist 1"));
    });
}

#[test]
fn playlist_rejects_malformed_reply_as_invalid_format() {
    let addr = spawn_fake_generator("Here are some great songs!".to_string());
    let base_url = format!("http://{addr}");

    with_env(&[("ROYAL_AI_API_KEY", "test-key"), ("ROYAL_AI_BASE_URL", &base_url)], || {
        let result = playlist::run(&playlist_args(20));
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_format");
    });
}

#[test]
fn playlist_rejects_off_step_track_count_before_any_request() {
    with_env(&[], || {
        let result = playlist::run(&playlist_args(12));
        assert_eq!(result.exit_code, 1);
        assert_eq!(parse_payload(&result.output)["error_class"], "bad_request");
    });
}

#[test]
fn join_without_lead_store_reports_not_configured() {
    with_env(&[], || {
        let result = join::run(&join_args("vip@example.com"));
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "configuration_missing");
        assert_eq!(payload["message"], "Error: Database connection is not configured.");
    });
}

#[test]
fn join_with_sqlite_store_welcomes_the_lead() {
    with_env(&[("ROYAL_LEADS_BACKEND", "sqlite"), ("ROYAL_LEADS_URL", "sqlite::memory:")], || {
        let result = join::run(&join_args("vip@example.com"));
        assert_eq!(result.exit_code, 0, "unexpected output: {}", result.output);
        assert_eq!(parse_payload(&result.output)["message"], "Welcome to the Royal Circle! 💎");
    });
}

#[test]
fn join_with_blank_email_is_a_bad_request() {
    with_env(&[("ROYAL_LEADS_BACKEND", "sqlite"), ("ROYAL_LEADS_URL", "sqlite::memory:")], || {
        let result = join::run(&join_args("  "));
        assert_eq!(result.exit_code, 1);
        assert_eq!(parse_payload(&result.output)["error_class"], "bad_request");
    });
}

#[test]
fn migrate_returns_success_with_sqlite_backend() {
    with_env(&[("ROYAL_LEADS_BACKEND", "sqlite"), ("ROYAL_LEADS_URL", "sqlite::memory:")], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_applies_to_a_file_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("leads.db").display());

    with_env(&[("ROYAL_LEADS_BACKEND", "sqlite"), ("ROYAL_LEADS_URL", &url)], || {
        assert_eq!(migrate::run().exit_code, 0);
        assert_eq!(migrate::run().exit_code, 0, "second run is a no-op");
    });
}

#[test]
fn migrate_refuses_hosted_backend() {
    with_env(&[], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn config_output_attributes_sources_and_redacts_keys() {
    with_env(&[("ROYAL_AI_API_KEY", "AIzaSyExampleKey"), ("ROYAL_LOG_LEVEL", "debug")], || {
        let output = config::run();

        assert!(output.contains("- ai.api_key = AIza*** (source: env (ROYAL_AI_API_KEY))"));
        assert!(!output.contains("AIzaSyExampleKey"));
        assert!(output.contains("- logging.level = debug (source: env (ROYAL_LOG_LEVEL))"));
        assert!(output.contains("- pricing.hourly_rate = 150 (source: default)"));
        assert!(output.contains("- leads.anon_key = <unset> (source: default)"));
    });
}

#[test]
fn doctor_flags_missing_credentials() {
    with_env(&[], || {
        let report: Value = serde_json::from_str(&doctor::run(true)).expect("doctor json");

        assert_eq!(report["overall_status"], "fail");
        let statuses: Vec<(&str, &str)> = report["checks"]
            .as_array()
            .map(|checks| {
                checks
                    .iter()
                    .map(|check| {
                        (
                            check["name"].as_str().unwrap_or_default(),
                            check["status"].as_str().unwrap_or_default(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(
            statuses,
            vec![
                ("config_validation", "pass"),
                ("ai_credential", "fail"),
                ("lead_store", "fail"),
            ]
        );
    });
}

#[test]
fn doctor_passes_with_key_and_sqlite_store() {
    with_env(
        &[
            ("ROYAL_AI_API_KEY", "test-key"),
            ("ROYAL_LEADS_BACKEND", "sqlite"),
            ("ROYAL_LEADS_URL", "sqlite::memory:"),
        ],
        || {
            let output = doctor::run(false);
            assert!(output.starts_with("doctor: all readiness checks passed"), "{output}");
            assert!(output.contains("- [ok] lead_store"));
        },
    );
}

fn quote_args() -> QuoteArgs {
    QuoteArgs { start: "19:00".to_string(), end: "23:00".to_string(), mics: false, lights: false }
}

fn book_args() -> BookArgs {
    BookArgs {
        client_name: "Jordan Avery".to_string(),
        email: "jordan@example.com".to_string(),
        phone: "555-0100".to_string(),
        event_type: EventType::Wedding,
        guests: 120,
        date: "2026-12-31".to_string(),
        start: "19:00".to_string(),
        end: "23:00".to_string(),
        address: "1 Palace Way".to_string(),
        mics: false,
        lights: false,
        payment_handle: String::new(),
        confirm: false,
    }
}

fn playlist_args(count: u32) -> PlaylistArgs {
    PlaylistArgs {
        vibe: "rooftop sunset cocktails".to_string(),
        genre: Some("house".to_string()),
        key_song: None,
        era: None,
        count,
    }
}

fn join_args(email: &str) -> JoinArgs {
    JoinArgs { email: email.to_string(), phone: None }
}

/// Serves `reply` as the text of every generateContent call. Runs on its own
/// thread because commands block on their own runtime.
fn spawn_fake_generator(reply: String) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fake generator");
    listener.set_nonblocking(true).expect("nonblocking listener");
    let addr = listener.local_addr().expect("fake generator address");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fake generator runtime");
        runtime.block_on(async move {
            let body = json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": reply }] } }]
            });
            let app = Router::new().route(
                "/v1beta/models/{model_action}",
                post(move || {
                    let body = body.clone();
                    async move { Json(body) }
                }),
            );
            let listener =
                tokio::net::TcpListener::from_std(listener).expect("tokio listener from std");
            let _ = axum::serve(listener, app).await;
        });
    });

    addr
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "ROYAL_AI_API_KEY",
        "API_KEY",
        "ROYAL_AI_BASE_URL",
        "ROYAL_AI_MODEL",
        "ROYAL_LEADS_BACKEND",
        "ROYAL_LEADS_URL",
        "VITE_SUPABASE_URL",
        "ROYAL_LEADS_ANON_KEY",
        "VITE_SUPABASE_ANON_KEY",
        "ROYAL_LEADS_TABLE",
        "ROYAL_LEADS_MAX_CONNECTIONS",
        "ROYAL_PRICING_HOURLY_RATE",
        "ROYAL_PRICING_MIC_FEE",
        "ROYAL_PRICING_LIGHTS_FEE",
        "ROYAL_PRICING_TRANSPORTATION_ESTIMATE",
        "ROYAL_PRICING_DEPOSIT_FRACTION",
        "ROYAL_PRICING_OVERTIME_RATE",
        "ROYAL_PAYMENT_LINK_BASE",
        "ROYAL_LOGGING_LEVEL",
        "ROYAL_LOGGING_FORMAT",
        "ROYAL_LOG_LEVEL",
        "ROYAL_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
