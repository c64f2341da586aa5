use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingInput;
use crate::domain::quote::{round_cents, Quote};

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Rates the quote engine prices against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSchedule {
    pub hourly_rate: Decimal,
    pub mic_fee: Decimal,
    pub lights_fee: Decimal,
    pub transportation_estimate: Decimal,
    pub deposit_fraction: Decimal,
    pub overtime_rate: Decimal,
}

impl Default for PricingSchedule {
    fn default() -> Self {
        Self {
            hourly_rate: Decimal::new(150, 0),
            mic_fee: Decimal::new(50, 0),
            lights_fee: Decimal::new(200, 0),
            transportation_estimate: Decimal::new(60, 0),
            deposit_fraction: Decimal::new(5, 1),
            overtime_rate: Decimal::new(100, 0),
        }
    }
}

/// The subset of the booking form that affects price.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteInput<'a> {
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub add_mics: bool,
    pub add_lights: bool,
}

impl<'a> From<&'a BookingInput> for QuoteInput<'a> {
    fn from(booking: &'a BookingInput) -> Self {
        Self {
            start_time: &booking.start_time,
            end_time: &booking.end_time,
            add_mics: booking.add_mics,
            add_lights: booking.add_lights,
        }
    }
}

pub trait PricingEngine: Send + Sync {
    fn quote(&self, input: &QuoteInput<'_>) -> Quote;

    fn quote_booking(&self, booking: &BookingInput) -> Quote {
        self.quote(&QuoteInput::from(booking))
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeterministicPricingEngine {
    schedule: PricingSchedule,
}

impl DeterministicPricingEngine {
    pub fn new(schedule: PricingSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &PricingSchedule {
        &self.schedule
    }
}

impl PricingEngine for DeterministicPricingEngine {
    fn quote(&self, input: &QuoteInput<'_>) -> Quote {
        price_event(&self.schedule, input)
    }
}

/// Prices an event. Never fails: unreadable times price as zero hours and
/// amounts saturate at `Decimal::MAX` instead of overflowing.
pub fn price_event(schedule: &PricingSchedule, input: &QuoteInput<'_>) -> Quote {
    let duration_secs = event_duration_secs(input.start_time, input.end_time).unwrap_or(0);
    let duration = Decimal::from(duration_secs);
    let per_hour = Decimal::from(SECONDS_PER_HOUR);

    let base_fee = round_cents(schedule.hourly_rate.saturating_mul(duration) / per_hour);
    let mic_fee = if input.add_mics { schedule.mic_fee } else { Decimal::ZERO };
    let lights_fee = if input.add_lights { schedule.lights_fee } else { Decimal::ZERO };
    let transportation_fee = schedule.transportation_estimate;

    let total = base_fee
        .saturating_add(mic_fee)
        .saturating_add(lights_fee)
        .saturating_add(transportation_fee);
    let deposit = round_cents(total.saturating_mul(schedule.deposit_fraction));
    let balance = total.saturating_sub(deposit);

    Quote {
        duration_minutes: u32::try_from(duration_secs / 60).unwrap_or(0),
        duration_hours: (duration / per_hour).round_dp(2).normalize(),
        hourly_rate: schedule.hourly_rate,
        base_fee,
        mic_fee,
        lights_fee,
        transportation_fee,
        total,
        deposit,
        balance,
        add_mics: input.add_mics,
        add_lights: input.add_lights,
    }
}

/// Seconds between two clock times on one reference day. An end at or before
/// the start runs past midnight.
pub fn event_duration_secs(start_time: &str, end_time: &str) -> Option<i64> {
    let start = parse_clock_time(start_time)?;
    let end = parse_clock_time(end_time)?;

    let mut seconds = (end - start).num_seconds();
    if seconds <= 0 {
        seconds += SECONDS_PER_DAY;
    }
    Some(seconds)
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        event_duration_secs, price_event, DeterministicPricingEngine, PricingEngine,
        PricingSchedule, QuoteInput,
    };
    use crate::domain::booking::BookingInput;

    fn input<'a>(start: &'a str, end: &'a str, mics: bool, lights: bool) -> QuoteInput<'a> {
        QuoteInput { start_time: start, end_time: end, add_mics: mics, add_lights: lights }
    }

    #[test]
    fn standard_evening_quote() {
        let schedule = PricingSchedule::default();
        let quote = price_event(&schedule, &input("19:00", "23:00", false, false));

        assert_eq!(quote.duration_minutes, 240);
        assert_eq!(quote.base_fee, Decimal::new(600, 0));
        assert_eq!(quote.total, Decimal::new(660, 0));
        assert_eq!(quote.deposit, Decimal::new(330, 0));
        assert_eq!(quote.balance, Decimal::new(330, 0));
    }

    #[test]
    fn overnight_event_wraps_past_midnight() {
        assert_eq!(event_duration_secs("23:00", "01:00"), Some(2 * 3_600));

        let schedule = PricingSchedule::default();
        let quote = price_event(&schedule, &input("23:00", "01:00", false, false));
        assert_eq!(quote.duration_hours, Decimal::new(2, 0));
        assert_eq!(quote.base_fee, Decimal::new(300, 0));
    }

    #[test]
    fn identical_start_and_end_is_a_full_day() {
        assert_eq!(event_duration_secs("20:00", "20:00"), Some(24 * 3_600));
    }

    #[test]
    fn malformed_times_price_as_zero_hours() {
        for (start, end) in [("", "23:00"), ("7pm", "11pm"), ("19:00", "25:99")] {
            let quote = price_event(&PricingSchedule::default(), &input(start, end, false, false));
            assert_eq!(quote.duration_minutes, 0, "{start}-{end}");
            assert_eq!(quote.base_fee, Decimal::ZERO);
            assert_eq!(quote.total, Decimal::new(60, 0));
        }
    }

    #[test]
    fn add_on_fees_are_independent_of_times() {
        let schedule = PricingSchedule::default();
        for (start, end) in [("19:00", "23:00"), ("bogus", "")] {
            let with_mics = price_event(&schedule, &input(start, end, true, false));
            let without = price_event(&schedule, &input(start, end, false, false));

            assert_eq!(with_mics.mic_fee, schedule.mic_fee);
            assert_eq!(without.mic_fee, Decimal::ZERO);
            assert_eq!(with_mics.total - without.total, schedule.mic_fee);
        }

        let lit = price_event(&schedule, &input("19:00", "23:00", false, true));
        assert_eq!(lit.lights_fee, Decimal::new(200, 0));
    }

    #[test]
    fn totals_and_deposit_split_are_exact_for_every_quarter_hour() {
        let schedule = PricingSchedule {
            hourly_rate: Decimal::new(13_333, 2),
            deposit_fraction: Decimal::new(1, 0) / Decimal::new(3, 0),
            ..PricingSchedule::default()
        };

        for start_minutes in (0..24 * 60).step_by(95) {
            for end_minutes in (0..24 * 60).step_by(15) {
                let start = format!("{:02}:{:02}", start_minutes / 60, start_minutes % 60);
                let end = format!("{:02}:{:02}", end_minutes / 60, end_minutes % 60);
                let quote = price_event(&schedule, &input(&start, &end, true, true));

                assert_eq!(quote.total, quote.fee_sum(), "{start}-{end}");
                assert_eq!(quote.deposit + quote.balance, quote.total, "{start}-{end}");
                assert!(quote.total >= quote.transportation_fee);
                assert!(quote.duration_minutes > 0 && quote.duration_minutes <= 24 * 60);
            }
        }
    }

    #[test]
    fn extreme_rates_saturate_instead_of_panicking() {
        let schedule = PricingSchedule {
            hourly_rate: Decimal::MAX,
            mic_fee: Decimal::MAX,
            lights_fee: Decimal::MAX,
            ..PricingSchedule::default()
        };

        let quote = price_event(&schedule, &input("19:00", "23:00", true, true));

        assert_eq!(quote.total, Decimal::MAX);
        assert_eq!(quote.deposit + quote.balance, quote.total);
        assert!(quote.base_fee > Decimal::ZERO);
    }

    #[test]
    fn quote_remembers_selected_add_ons_even_when_free() {
        let schedule = PricingSchedule { mic_fee: Decimal::ZERO, ..PricingSchedule::default() };
        let quote = price_event(&schedule, &input("19:00", "23:00", true, false));

        assert!(quote.add_mics);
        assert!(!quote.add_lights);
        assert_eq!(quote.mic_fee, Decimal::ZERO);
    }

    #[test]
    fn seconds_precision_times_are_accepted() {
        assert_eq!(event_duration_secs("19:00:00", "19:30:00"), Some(1_800));
    }

    #[test]
    fn engine_uses_injected_schedule() {
        let engine = DeterministicPricingEngine::new(PricingSchedule {
            hourly_rate: Decimal::new(200, 0),
            transportation_estimate: Decimal::ZERO,
            ..PricingSchedule::default()
        });
        let booking = BookingInput { add_lights: true, ..BookingInput::default() };

        let quote = engine.quote_booking(&booking);
        assert_eq!(quote.base_fee, Decimal::new(800, 0));
        assert_eq!(quote.total, Decimal::new(1_000, 0));
        assert_eq!(quote.deposit, Decimal::new(500, 0));
    }
}
