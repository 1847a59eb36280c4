//! Deal price resolution.
//!
//! A prospect may carry its price in up to three places. [`PRICE_RESOLVERS`]
//! lists them in priority order; [`resolve_price`] returns the first strictly
//! positive value.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use salesdash_core::Prospect;

static FIRST_DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Reads one candidate price from a prospect.
pub type PriceResolver = fn(&Prospect) -> Option<Decimal>;

/// Price sources, highest priority first.
pub const PRICE_RESOLVERS: [(&str, PriceResolver); 3] = [
    ("price_excl_tax", price_excl_tax as PriceResolver),
    ("revenue_excl_tax", revenue_excl_tax as PriceResolver),
    ("final_price_text", final_price_text as PriceResolver),
];

/// Returns the first resolved price greater than zero, or `None`.
#[must_use]
pub fn resolve_price(prospect: &Prospect) -> Option<Decimal> {
    PRICE_RESOLVERS
        .iter()
        .find_map(|(_, resolve)| resolve(prospect).filter(|price| *price > Decimal::ZERO))
}

fn price_excl_tax(prospect: &Prospect) -> Option<Decimal> {
    prospect.price_excl_tax
}

fn revenue_excl_tax(prospect: &Prospect) -> Option<Decimal> {
    prospect.revenue_excl_tax
}

/// Parses the first run of ASCII digits in the free-text price as an integer.
///
/// `"1 500 €"` yields 1: separators end the run.
fn final_price_text(prospect: &Prospect) -> Option<Decimal> {
    let text = prospect.final_price_text.as_deref()?;
    let digits = FIRST_DIGIT_RUN_RE.find(text)?;
    digits.as_str().parse::<Decimal>().ok()
}
