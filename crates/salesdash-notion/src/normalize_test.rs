use rust_decimal::Decimal;
use serde_json::json;

use super::*;

fn page(properties: serde_json::Value) -> Page {
    serde_json::from_value(json!({ "id": "page-1", "properties": properties }))
        .expect("fixture should deserialize")
}

#[test]
fn full_row_normalizes_every_field() {
    let row = page(json!({
        "Statut": { "id": "a", "type": "select", "select": { "name": "Contrat signé" } },
        "Nombre d'appel": { "id": "b", "type": "number", "number": 4 },
        "Tarif HT": { "id": "c", "type": "number", "number": 1500.5 },
        "CA HT": { "id": "d", "type": "number", "number": null },
        "Tarif final": { "id": "e", "type": "rich_text", "rich_text": [{ "plain_text": "1800 € HT" }] },
        "Lieu": { "id": "f", "type": "multi_select", "multi_select": [{ "name": "Rooftop" }, { "name": "Tama" }] },
        "Canal d'acquisition": { "id": "g", "type": "select", "select": { "name": "Instagram" } },
        "Date de demande": { "id": "h", "type": "date", "date": { "start": "2026-03-14", "end": null } },
        "Raison de refus": { "id": "i", "type": "select", "select": null }
    }));

    let prospect = normalize_page(&row);

    assert_eq!(prospect.status, Some(PipelineStage::Signed));
    assert_eq!(prospect.raw_status.as_deref(), Some("Contrat signé"));
    assert_eq!(prospect.call_count, Some(4.0));
    assert_eq!(prospect.price_excl_tax, Some(Decimal::new(15005, 1)));
    assert_eq!(prospect.revenue_excl_tax, None);
    assert_eq!(prospect.final_price_text.as_deref(), Some("1800 € HT"));
    assert_eq!(prospect.venues, vec!["Rooftop".to_string(), "Tama".to_string()]);
    assert_eq!(prospect.acquisition_channel.as_deref(), Some("Instagram"));
    assert_eq!(prospect.request_date, NaiveDate::from_ymd_opt(2026, 3, 14));
    assert_eq!(prospect.refusal_reason, None);
}

#[test]
fn status_falls_back_to_workflow_representation() {
    let row = page(json!({
        "Statut": { "type": "status", "status": { "name": "Pas de réponse" } }
    }));
    assert_eq!(normalize_page(&row).status, Some(PipelineStage::NoResponse));
    assert_eq!(status_representation(&row), Some("status"));
}

#[test]
fn unknown_status_label_is_kept_raw() {
    let row = page(json!({
        "Statut": { "type": "select", "select": { "name": "Archivé" } }
    }));
    let prospect = normalize_page(&row);
    assert_eq!(prospect.status, None);
    assert_eq!(prospect.raw_status.as_deref(), Some("Archivé"));
}

#[test]
fn channel_falls_back_to_first_multi_select_label() {
    let row = page(json!({
        "Canal d'acquisition": {
            "type": "multi_select",
            "multi_select": [{ "name": "Bouche à oreille" }, { "name": "Google" }]
        }
    }));
    assert_eq!(
        normalize_page(&row).acquisition_channel.as_deref(),
        Some("Bouche à oreille")
    );
}

#[test]
fn empty_channel_is_absent() {
    let row = page(json!({
        "Canal d'acquisition": { "type": "select", "select": { "name": "" } }
    }));
    assert_eq!(normalize_page(&row).acquisition_channel, None);
}

#[test]
fn final_price_reads_title_fragments() {
    let row = page(json!({
        "Tarif final": { "type": "title", "title": [{ "plain_text": "2 000" }] }
    }));
    assert_eq!(normalize_page(&row).final_price_text.as_deref(), Some("2 000"));
}

#[test]
fn negative_call_count_is_absent() {
    let row = page(json!({
        "Nombre d'appel": { "type": "number", "number": -2 }
    }));
    assert_eq!(normalize_page(&row).call_count, None);
}

#[test]
fn fractional_call_count_is_kept() {
    let row = page(json!({
        "Nombre d'appel": { "type": "number", "number": 0.4 }
    }));
    assert_eq!(normalize_page(&row).call_count, Some(0.4));
}

#[test]
fn request_date_without_offset_is_read() {
    let row = page(json!({
        "Date de demande": {
            "type": "date",
            "date": { "start": "2026-04-26T08:00:00.000", "end": null, "time_zone": "Europe/Paris" }
        }
    }));
    assert_eq!(
        normalize_page(&row).request_date,
        NaiveDate::from_ymd_opt(2026, 4, 26)
    );
}

#[test]
fn malformed_properties_are_treated_as_absent() {
    let row = page(json!({
        "Statut": { "type": "select", "select": "not-an-object" },
        "Nombre d'appel": { "type": "number", "number": "three" },
        "Lieu": "Rooftop",
        "Date de demande": { "type": "date", "date": { "start": "yesterday" } },
        "Tarif HT": { "type": "formula", "formula": { "number": 10 } }
    }));
    let prospect = normalize_page(&row);
    assert_eq!(prospect, Prospect::default());
}

#[test]
fn status_representation_is_none_without_column() {
    let row = page(json!({}));
    assert_eq!(status_representation(&row), None);
}

#[test]
fn parse_date_accepts_plain_dates() {
    assert_eq!(parse_date("2025-12-01"), NaiveDate::from_ymd_opt(2025, 12, 1));
}

#[test]
fn parse_date_takes_date_component_of_datetimes() {
    assert_eq!(
        parse_date("2025-12-31T23:30:00.000+01:00"),
        NaiveDate::from_ymd_opt(2025, 12, 31)
    );
}

#[test]
fn parse_date_accepts_datetimes_without_offset() {
    assert_eq!(
        parse_date("2026-04-26T08:00:00.000"),
        NaiveDate::from_ymd_opt(2026, 4, 26)
    );
    assert_eq!(
        parse_date("2026-04-26T23:59:59"),
        NaiveDate::from_ymd_opt(2026, 4, 26)
    );
}

#[test]
fn parse_date_rejects_garbage() {
    assert_eq!(parse_date("31/12/2025"), None);
    assert_eq!(parse_date(""), None);
}
