use std::sync::Arc;

use clap::Args;
use royal_agent::{GeminiClient, LlmClient, PlaylistGenerator, PlaylistSession};
use royal_core::domain::playlist::{PlaylistRequest, DEFAULT_TRACK_COUNT};
use royal_core::errors::ApplicationError;

use crate::commands::{build_runtime, load_config, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct PlaylistArgs {
    #[arg(long, help = "Describe the vibe, e.g. \"sunset rooftop cocktails\"")]
    pub vibe: String,
    #[arg(long, help = "Genre(s) to lean on")]
    pub genre: Option<String>,
    #[arg(long = "key-song", help = "A song to build the set around")]
    pub key_song: Option<String>,
    #[arg(long, help = "Era or year range")]
    pub era: Option<String>,
    #[arg(long, default_value_t = DEFAULT_TRACK_COUNT, help = "10-50 songs, in steps of 5")]
    pub count: u32,
}

pub fn run(args: &PlaylistArgs) -> CommandResult {
    let request = match PlaylistRequest::new(
        args.vibe.as_str(),
        args.genre.clone(),
        args.key_song.clone(),
        args.era.clone(),
        args.count,
    ) {
        Ok(request) => request,
        Err(error) => {
            return CommandResult::failure("playlist", "bad_request", error.to_string(), 1);
        }
    };

    let config = match load_config("playlist") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let llm: Arc<dyn LlmClient> = match GeminiClient::from_config(&config.ai) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            return CommandResult::failure("playlist", "client_init", error.to_string(), 3);
        }
    };
    let runtime = match build_runtime("playlist") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let mut session = PlaylistSession::new(PlaylistGenerator::new(llm));
    if let Err(error) = runtime.block_on(session.generate(&request)) {
        let message = error.user_message();
        return CommandResult::from_application_error(
            "playlist",
            ApplicationError::from(error),
            message,
        );
    }

    let data = serde_json::json!({
        "songs": session.playlist().map(|playlist| &playlist.songs),
        "text": session.export_text(),
    });
    let count = session.playlist().map_or(0, |playlist| playlist.len());
    CommandResult::success_with_data("playlist", format!("generated {count} songs"), data)
}
