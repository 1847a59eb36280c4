//! Conversion of Notion rows into [`salesdash_core::Prospect`] records.
//!
//! Every accessor is defensive: a missing property, an unexpected property
//! type, or an empty value yields `None`. Normalization never fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use salesdash_core::{PipelineStage, Prospect};

use crate::types::{DateValue, Page, PropertyValue, RichText, SelectOption};

/// Column names in the prospects database.
pub mod property {
    pub const STATUS: &str = "Statut";
    pub const CALL_COUNT: &str = "Nombre d'appel";
    pub const PRICE_EXCL_TAX: &str = "Tarif HT";
    pub const REVENUE_EXCL_TAX: &str = "CA HT";
    pub const FINAL_PRICE: &str = "Tarif final";
    pub const VENUE: &str = "Lieu";
    pub const ACQUISITION_CHANNEL: &str = "Canal d'acquisition";
    pub const REQUEST_DATE: &str = "Date de demande";
    pub const REFUSAL_REASON: &str = "Raison de refus";
}

/// Converts a Notion row into a [`Prospect`].
#[must_use]
pub fn normalize_page(page: &Page) -> Prospect {
    let raw_status = status_label(page);
    let status = raw_status.as_deref().and_then(PipelineStage::from_label);

    Prospect {
        status,
        raw_status,
        call_count: call_count(page),
        price_excl_tax: decimal(page, property::PRICE_EXCL_TAX),
        revenue_excl_tax: decimal(page, property::REVENUE_EXCL_TAX),
        final_price_text: text(page, property::FINAL_PRICE),
        venues: multi_select_names(page, property::VENUE),
        acquisition_channel: channel(page),
        request_date: date(page, property::REQUEST_DATE),
        refusal_reason: select_name(page, property::REFUSAL_REASON),
    }
}

/// Names the representation of the status column (`"select"`, `"status"` or
/// `"other"`), or `None` if the row has no such column.
#[must_use]
pub fn status_representation(page: &Page) -> Option<&'static str> {
    page.properties.get(property::STATUS)?;
    Some(match page.property(property::STATUS) {
        Some(PropertyValue::Select { .. }) => "select",
        Some(PropertyValue::Status { .. }) => "status",
        _ => "other",
    })
}

/// Reads the status label from the `select` representation, falling back to
/// the workflow `status` representation.
fn status_label(page: &Page) -> Option<String> {
    let value = page.property(property::STATUS)?;
    select_option(&value)
        .or_else(|| workflow_option(&value))
        .and_then(non_empty_name)
}

fn select_option(value: &PropertyValue) -> Option<&SelectOption> {
    match value {
        PropertyValue::Select { select } => select.as_ref(),
        _ => None,
    }
}

fn workflow_option(value: &PropertyValue) -> Option<&SelectOption> {
    match value {
        PropertyValue::Status { status } => status.as_ref(),
        _ => None,
    }
}

fn non_empty_name(option: &SelectOption) -> Option<String> {
    let name = option.name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn select_name(page: &Page, name: &str) -> Option<String> {
    let value = page.property(name)?;
    select_option(&value).and_then(non_empty_name)
}

/// Channel from a single `select`, or the first label of a `multi_select`.
fn channel(page: &Page) -> Option<String> {
    match page.property(property::ACQUISITION_CHANNEL)? {
        PropertyValue::Select {
            select: Some(option),
        } => non_empty_name(&option),
        PropertyValue::MultiSelect { multi_select } => {
            multi_select.first().and_then(non_empty_name)
        }
        _ => None,
    }
}

fn multi_select_names(page: &Page, name: &str) -> Vec<String> {
    match page.property(name) {
        Some(PropertyValue::MultiSelect { multi_select }) => {
            multi_select.iter().filter_map(non_empty_name).collect()
        }
        _ => Vec::new(),
    }
}

fn number(page: &Page, name: &str) -> Option<f64> {
    match page.property(name)? {
        PropertyValue::Number { number: Some(n) } if n.is_finite() => Some(n),
        _ => None,
    }
}

fn decimal(page: &Page, name: &str) -> Option<Decimal> {
    number(page, name).and_then(|n| Decimal::try_from(n).ok())
}

/// Call count as entered, fractions kept; negative values are absent.
fn call_count(page: &Page) -> Option<f64> {
    number(page, property::CALL_COUNT).filter(|n| *n >= 0.0)
}

/// First text fragment of a `rich_text` or `title` property.
fn text(page: &Page, name: &str) -> Option<String> {
    let fragments: Vec<RichText> = match page.property(name)? {
        PropertyValue::RichText { rich_text } => rich_text,
        PropertyValue::Title { title } => title,
        _ => return None,
    };
    let first = fragments.into_iter().next()?;
    let trimmed = first.plain_text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn date(page: &Page, name: &str) -> Option<NaiveDate> {
    match page.property(name)? {
        PropertyValue::Date {
            date: Some(DateValue { start: Some(start) }),
        } => parse_date(&start),
        _ => None,
    }
}

/// Parses a Notion date: `"YYYY-MM-DD"`, an RFC 3339 date-time (the date in
/// the value's own offset is taken), or a date-time without offset as Notion
/// sends when the property carries a `time_zone`.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
