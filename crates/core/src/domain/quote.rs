use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Priced breakdown derived from a booking. Never edited directly; recompute it
/// from the form whenever an input changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub duration_minutes: u32,
    pub duration_hours: Decimal,
    pub hourly_rate: Decimal,
    pub base_fee: Decimal,
    pub mic_fee: Decimal,
    pub lights_fee: Decimal,
    pub transportation_fee: Decimal,
    pub total: Decimal,
    pub deposit: Decimal,
    pub balance: Decimal,
    /// Add-ons as selected on the form, independent of what they cost.
    pub add_mics: bool,
    pub add_lights: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteLineKind {
    Performance,
    Microphones,
    Lighting,
    Transportation,
    Total,
    Deposit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub kind: QuoteLineKind,
    pub label: String,
    pub amount: Decimal,
}

impl Quote {
    /// Summary rows in display order. Add-on rows appear when selected, even
    /// if the configured fee is zero.
    pub fn lines(&self) -> Vec<QuoteLine> {
        let mut lines = vec![QuoteLine {
            kind: QuoteLineKind::Performance,
            label: format!("Base Fee ({:.1} hrs)", self.duration_hours),
            amount: self.base_fee,
        }];

        if self.add_mics {
            lines.push(QuoteLine {
                kind: QuoteLineKind::Microphones,
                label: "Microphones".to_string(),
                amount: self.mic_fee,
            });
        }
        if self.add_lights {
            lines.push(QuoteLine {
                kind: QuoteLineKind::Lighting,
                label: "DJ Lights".to_string(),
                amount: self.lights_fee,
            });
        }

        lines.push(QuoteLine {
            kind: QuoteLineKind::Transportation,
            label: "Est. Transportation".to_string(),
            amount: self.transportation_fee,
        });
        lines.push(QuoteLine {
            kind: QuoteLineKind::Total,
            label: "Total".to_string(),
            amount: self.total,
        });
        lines.push(QuoteLine {
            kind: QuoteLineKind::Deposit,
            label: "Deposit Due".to_string(),
            amount: self.deposit,
        });
        lines
    }

    pub fn fee_sum(&self) -> Decimal {
        self.base_fee + self.mic_fee + self.lights_fee + self.transportation_fee
    }
}

/// Renders an amount with exactly two decimal places.
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

/// A deposit fraction as a percentage with at most two decimals: `0.5` is
/// `"50"`, one third is `"33.33"`.
pub fn deposit_percent(fraction: Decimal) -> String {
    round_cents(fraction.saturating_mul(Decimal::ONE_HUNDRED)).normalize().to_string()
}

/// Rounds to cents, halves away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{deposit_percent, format_money, Quote, QuoteLineKind};

    fn quote(mic_fee: i64, lights_fee: i64) -> Quote {
        let base_fee = Decimal::new(600, 0);
        let total = base_fee + Decimal::new(mic_fee + lights_fee + 60, 0);
        let deposit = total / Decimal::TWO;
        Quote {
            duration_minutes: 240,
            duration_hours: Decimal::new(4, 0),
            hourly_rate: Decimal::new(150, 0),
            base_fee,
            mic_fee: Decimal::new(mic_fee, 0),
            lights_fee: Decimal::new(lights_fee, 0),
            transportation_fee: Decimal::new(60, 0),
            total,
            deposit,
            balance: total - deposit,
            add_mics: mic_fee > 0,
            add_lights: lights_fee > 0,
        }
    }

    fn kinds(quote: &Quote) -> Vec<QuoteLineKind> {
        quote.lines().into_iter().map(|line| line.kind).collect()
    }

    #[test]
    fn add_on_lines_only_appear_when_selected() {
        assert_eq!(
            kinds(&quote(0, 0)),
            vec![
                QuoteLineKind::Performance,
                QuoteLineKind::Transportation,
                QuoteLineKind::Total,
                QuoteLineKind::Deposit,
            ]
        );

        let kinds = kinds(&quote(50, 200));
        assert_eq!(kinds.len(), 6);
        assert_eq!(kinds[1], QuoteLineKind::Microphones);
        assert_eq!(kinds[2], QuoteLineKind::Lighting);
    }

    #[test]
    fn selected_add_on_with_zero_fee_still_gets_a_row() {
        let free_mics = Quote { add_mics: true, ..quote(0, 0) };
        let lines = free_mics.lines();

        assert_eq!(lines[1].kind, QuoteLineKind::Microphones);
        assert_eq!(lines[1].amount, Decimal::ZERO);
    }

    #[test]
    fn summary_ends_with_total_and_deposit() {
        let quote = quote(50, 0);
        let lines = quote.lines();
        let [.., total, deposit] = lines.as_slice() else {
            panic!("summary has at least two rows");
        };

        assert_eq!((total.kind.clone(), total.amount), (QuoteLineKind::Total, quote.total));
        assert_eq!((deposit.kind.clone(), deposit.amount), (QuoteLineKind::Deposit, quote.deposit));
    }

    #[test]
    fn deposit_percent_rounds_to_two_places() {
        assert_eq!(deposit_percent(Decimal::new(5, 1)), "50");
        assert_eq!(deposit_percent(Decimal::new(25, 2)), "25");
        assert_eq!(deposit_percent(Decimal::ONE / Decimal::new(3, 0)), "33.33");
        assert_eq!(deposit_percent(Decimal::ONE), "100");
    }

    #[test]
    fn base_fee_label_shows_one_decimal_of_hours() {
        let lines = quote(0, 0).lines();
        assert_eq!(lines[0].label, "Base Fee (4.0 hrs)");
    }

    #[test]
    fn fee_sum_matches_total() {
        let quote = quote(50, 200);
        assert_eq!(quote.fee_sum(), quote.total);
    }

    #[test]
    fn money_formats_to_two_places() {
        assert_eq!(format_money(Decimal::new(330, 0)), "330.00");
        assert_eq!(format_money(Decimal::new(12345, 3)), "12.35");
    }
}
