use clap::Args;
use royal_db::{open_lead_store, LeadCapture, LeadOutcome};
use tracing::error;

use crate::commands::{build_runtime, load_config, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct JoinArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, help = "Optional phone number")]
    pub phone: Option<String>,
}

pub fn run(args: &JoinArgs) -> CommandResult {
    let config = match load_config("join") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("join") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let outcome = runtime.block_on(async {
        let capture = match open_lead_store(&config.leads).await {
            Ok(store) => LeadCapture::new(store),
            Err(err) => {
                error!(
                    event_name = "leads.store.open_failed",
                    error = %err,
                    "lead store failed to open"
                );
                return LeadOutcome::Failed;
            }
        };
        capture.join(&args.email, args.phone.as_deref()).await
    });

    let message = outcome.user_message();
    match outcome {
        LeadOutcome::Joined => CommandResult::success("join", message),
        LeadOutcome::InvalidEmail => CommandResult::failure("join", "bad_request", message, 1),
        LeadOutcome::NotConfigured => {
            CommandResult::failure("join", "configuration_missing", message, 4)
        }
        LeadOutcome::Failed => CommandResult::failure("join", "service_unavailable", message, 5),
    }
}
