use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::format_money;

pub const DEFAULT_LINK_BASE: &str = "https://paypal.me";

/// Outbound deposit-collection link: `{base}/{handle}/{amount}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub url: String,
    pub handle: String,
    pub amount: String,
}

impl PaymentLink {
    /// `None` when no handle was entered. The handle is not validated.
    pub fn build(link_base: &str, handle: &str, deposit: Decimal) -> Option<Self> {
        let handle = handle.trim();
        if handle.is_empty() {
            return None;
        }

        let amount = format_money(deposit);
        let url = format!("{}/{handle}/{amount}", link_base.trim_end_matches('/'));
        Some(Self { url, handle: handle.to_string(), amount })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{PaymentLink, DEFAULT_LINK_BASE};

    #[test]
    fn link_combines_handle_and_two_decimal_deposit() {
        let link = PaymentLink::build(DEFAULT_LINK_BASE, "royalevents", Decimal::new(330, 0))
            .expect("handle present");
        assert_eq!(link.url, "https://paypal.me/royalevents/330.00");
        assert_eq!(link.amount, "330.00");
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let link = PaymentLink::build("https://pay.example/", "dj", Decimal::new(12_525, 2))
            .expect("handle present");
        assert_eq!(link.url, "https://pay.example/dj/125.25");
    }

    #[test]
    fn blank_handle_yields_no_link() {
        assert!(PaymentLink::build(DEFAULT_LINK_BASE, "  ", Decimal::ONE).is_none());
    }
}
