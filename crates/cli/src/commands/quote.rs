use clap::Args;
use royal_core::domain::quote::format_money;
use royal_core::pricing::{DeterministicPricingEngine, PricingEngine, QuoteInput};

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[arg(long, default_value = "19:00", help = "Event start time (HH:MM)")]
    pub start: String,
    #[arg(
        long,
        default_value = "23:00",
        help = "Event end time (HH:MM); earlier than start runs past midnight"
    )]
    pub end: String,
    #[arg(long, help = "Add cordless microphones")]
    pub mics: bool,
    #[arg(long, help = "Add the DJ lighting rig")]
    pub lights: bool,
}

pub fn run(args: &QuoteArgs) -> CommandResult {
    let config = match load_config("quote") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let engine = DeterministicPricingEngine::new(config.pricing);
    let quote = engine.quote(&QuoteInput {
        start_time: &args.start,
        end_time: &args.end,
        add_mics: args.mics,
        add_lights: args.lights,
    });

    let data = serde_json::json!({
        "quote": &quote,
        "lines": quote.lines(),
    });
    CommandResult::success_with_data(
        "quote",
        format!("total ${} (deposit ${})", format_money(quote.total), format_money(quote.deposit)),
        data,
    )
}
