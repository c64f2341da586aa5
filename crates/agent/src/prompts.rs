use royal_core::domain::booking::BookingInput;
use royal_core::domain::contract::BusinessTerms;
use royal_core::domain::playlist::PlaylistRequest;
use royal_core::domain::quote::{deposit_percent, format_money, Quote};
use rust_decimal::Decimal;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

pub const BASE_EQUIPMENT: &str = "Base DJ Service (Laptop, DJ Controller, 2 Speakers)";
pub const MICROPHONE_EQUIPMENT: &str = "Cordless Microphones";
pub const LIGHTING_EQUIPMENT: &str = "Professional DJ Lighting Rig";

const CONTRACT_TEMPLATE: &str = r#"You are a legal assistant specializing in contracts for freelance entertainers.
Generate a professional DJ Service Agreement for "{{ business_name }}" based on the following details.
The output should be clean, well-formatted text, suitable for display on a webpage.

**Event Details:**
- Client Name: {{ client_name }}
- Client Email: {{ email }}
- Client Phone: {{ phone }}
- Event Type: {{ event_type }}
- Event Date: {{ event_date }}
- Start Time: {{ start_time }}
- End Time: {{ end_time }}
- Total Duration: {{ duration_hours }} hours
- Venue Address: {{ venue_address }}
- Expected Guests: {{ guest_count }}

**Services & Equipment Provided:**
{% for item in equipment %}- {{ item }}
{% endfor %}
**Financial Agreement:**
- DJ Performance Fee: ${{ base_fee }} ({{ duration_hours }} hours at ${{ hourly_rate }}/hour)
- Equipment Fee (Mics): ${{ mic_fee }}
- DJ Lights Fee: ${{ lights_fee }}
- Estimated Transportation Fee: ${{ transportation_fee }}
- **Total Estimated Fee:** ${{ total }}
- **{{ deposit_percent }}% Deposit Required:** ${{ deposit }} (Due upon signing to secure the date)
- **Remaining Balance:** ${{ balance }} (Due upon DJ's arrival at the event)

**Terms & Conditions:**
{% for clause in clauses %}{{ loop.index }}.  **{{ clause.title }}:** {{ clause.body }}
{% endfor %}
Generate the complete DJ Service Agreement document now.
"#;

const PLAYLIST_TEMPLATE: &str = r#"You are a world-class DJ and music curator known as "Vibe Creator AI" for {{ business_name }}.
Your task is to generate a playlist of exactly {{ track_count }} songs based on the user's request. The playlist should be coherent and flow well.

User Request:
- Vibe/Description: "{{ vibe }}"
- Genre(s): {{ genres }}
- Key Song (to build around): {{ anchor_song }}
- Era/Year: {{ era }}

Generate a list of exactly {{ track_count }} songs that match these criteria.
"#;

#[derive(Debug, Error)]
#[error("prompt template `{template}` failed to render: {message}")]
pub struct PromptError {
    pub template: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct Clause<'a> {
    title: &'static str,
    body: &'a str,
}

/// Equipment lines for the agreement; add-ons only when selected.
pub fn equipment_list(booking: &BookingInput) -> Vec<&'static str> {
    let mut items = vec![BASE_EQUIPMENT];
    if booking.add_mics {
        items.push(MICROPHONE_EQUIPMENT);
    }
    if booking.add_lights {
        items.push(LIGHTING_EQUIPMENT);
    }
    items
}

pub fn contract_prompt(
    booking: &BookingInput,
    quote: &Quote,
    terms: &BusinessTerms,
    deposit_fraction: Decimal,
) -> Result<String, PromptError> {
    let clauses: Vec<Clause<'_>> =
        terms.clauses().into_iter().map(|(title, body)| Clause { title, body }).collect();

    let mut context = Context::new();
    context.insert("business_name", &terms.business_name);
    context.insert("client_name", &booking.client_name);
    context.insert("email", &booking.email);
    context.insert("phone", &booking.phone);
    context.insert("event_type", booking.event_type.label());
    context.insert("event_date", &booking.event_date);
    context.insert("start_time", &booking.start_time);
    context.insert("end_time", &booking.end_time);
    context.insert("duration_hours", &quote.duration_hours.normalize().to_string());
    context.insert("venue_address", &booking.venue_address);
    context.insert("guest_count", &booking.guest_count);
    context.insert("equipment", &equipment_list(booking));
    context.insert("hourly_rate", &quote.hourly_rate.normalize().to_string());
    context.insert("base_fee", &format_money(quote.base_fee));
    context.insert("mic_fee", &format_money(quote.mic_fee));
    context.insert("lights_fee", &format_money(quote.lights_fee));
    context.insert("transportation_fee", &format_money(quote.transportation_fee));
    context.insert("total", &format_money(quote.total));
    context.insert("deposit_percent", &deposit_percent(deposit_fraction));
    context.insert("deposit", &format_money(quote.deposit));
    context.insert("balance", &format_money(quote.balance));
    context.insert("clauses", &clauses);

    render("contract", CONTRACT_TEMPLATE, &context)
}

pub fn playlist_prompt(
    request: &PlaylistRequest,
    business_name: &str,
) -> Result<String, PromptError> {
    let mut context = Context::new();
    context.insert("business_name", business_name);
    context.insert("track_count", &request.track_count());
    context.insert("vibe", request.vibe());
    context.insert("genres", request.genres().unwrap_or("any"));
    context.insert("anchor_song", request.anchor_song().unwrap_or("none"));
    context.insert("era", request.era().unwrap_or("any"));

    render("playlist", PLAYLIST_TEMPLATE, &context)
}

fn render(template: &'static str, source: &str, context: &Context) -> Result<String, PromptError> {
    Tera::one_off(source, context, false)
        .map_err(|err| PromptError { template, message: err.to_string() })
}
