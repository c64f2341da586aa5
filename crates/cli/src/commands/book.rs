use std::sync::Arc;

use clap::Args;
use royal_agent::{BookingError, BookingSession, GeminiClient, LlmClient};
use royal_core::domain::booking::{BookingInput, EventType};
use royal_core::errors::ApplicationError;

use crate::commands::{build_runtime, load_config, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    #[arg(long = "name", help = "Client name")]
    pub client_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value_t = EventType::default(), help = "Event type, e.g. \"Wedding\"")]
    pub event_type: EventType,
    #[arg(long, default_value_t = 50)]
    pub guests: u32,
    #[arg(long, help = "Event date (YYYY-MM-DD)")]
    pub date: String,
    #[arg(long, default_value = "19:00")]
    pub start: String,
    #[arg(long, default_value = "23:00")]
    pub end: String,
    #[arg(long, help = "Venue address")]
    pub address: String,
    #[arg(long)]
    pub mics: bool,
    #[arg(long)]
    pub lights: bool,
    #[arg(long, default_value = "", help = "Merchant handle used for the deposit link")]
    pub payment_handle: String,
    #[arg(long, help = "Accept the drafted contract and print the deposit link")]
    pub confirm: bool,
}

impl BookArgs {
    fn booking_input(&self) -> BookingInput {
        BookingInput {
            client_name: self.client_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            event_type: self.event_type,
            guest_count: self.guests,
            event_date: self.date.clone(),
            start_time: self.start.clone(),
            end_time: self.end.clone(),
            venue_address: self.address.clone(),
            add_mics: self.mics,
            add_lights: self.lights,
            payment_handle: self.payment_handle.clone(),
        }
    }
}

pub fn run(args: &BookArgs) -> CommandResult {
    let config = match load_config("book") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let llm: Arc<dyn LlmClient> = match GeminiClient::from_config(&config.ai) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            return CommandResult::failure("book", "client_init", error.to_string(), 3);
        }
    };
    let runtime = match build_runtime("book") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let mut session = BookingSession::from_config(&config, llm);
    let input = args.booking_input();
    let booked = runtime.block_on(async {
        session.edit_booking(|booking| *booking = input)?;
        session.draft_contract().await?;
        if args.confirm {
            session.confirm_booking()?;
        }
        Ok::<(), BookingError>(())
    });

    if let Err(error) = booked {
        let message = error.user_message();
        return CommandResult::from_application_error(
            "book",
            ApplicationError::from(error),
            message,
        );
    }

    let quote = session.quote();
    let data = serde_json::json!({
        "state": format!("{:?}", session.state()),
        "quote": &quote,
        "contract": session.wizard().contract().map(|contract| contract.as_str()),
        "payment_link": session.payment_link().map(|link| link.url.as_str()),
    });
    let message = if session.payment_link().is_some() {
        "booking confirmed; deposit link ready"
    } else if args.confirm {
        "booking confirmed"
    } else {
        "contract drafted; review and confirm to receive the deposit link"
    };
    CommandResult::success_with_data("book", message, data)
}
