use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position of a prospect in the sales funnel.
///
/// The seven variants are listed in funnel order; [`PipelineStage::ALL`]
/// preserves that order for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Prospect,
    Qualified,
    AwaitingVisit,
    Visited,
    Signed,
    Declined,
    NoResponse,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 7] = [
        PipelineStage::Prospect,
        PipelineStage::Qualified,
        PipelineStage::AwaitingVisit,
        PipelineStage::Visited,
        PipelineStage::Signed,
        PipelineStage::Declined,
        PipelineStage::NoResponse,
    ];

    /// The label used for this stage in the source database's `Statut` column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Prospect => "Prospect",
            PipelineStage::Qualified => "Qualifié",
            PipelineStage::AwaitingVisit => "En attente de visite",
            PipelineStage::Visited => "Visité",
            PipelineStage::Signed => "Contrat signé",
            PipelineStage::Declined => "Réponse négative",
            PipelineStage::NoResponse => "Pas de réponse",
        }
    }

    /// Maps a source label back to its stage. Matching is exact after
    /// trimming surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|stage| stage.label() == label)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One sales prospect as read from the source database.
///
/// Every attribute is optional: the source enforces no schema, and absent or
/// malformed properties are carried as `None` rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    /// Recognised funnel stage, if the raw status matched one.
    pub status: Option<PipelineStage>,
    /// Status label exactly as the source returned it.
    pub raw_status: Option<String>,
    /// `Nombre d'appel` as entered. Kept fractional so any positive value
    /// counts toward the call average.
    pub call_count: Option<f64>,
    /// Primary price field (`Tarif HT`).
    pub price_excl_tax: Option<Decimal>,
    /// Secondary price field (`CA HT`).
    pub revenue_excl_tax: Option<Decimal>,
    /// Free-text price (`Tarif final`), e.g. `"1500 € HT"`.
    pub final_price_text: Option<String>,
    pub venues: Vec<String>,
    pub acquisition_channel: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub refusal_reason: Option<String>,
}

impl Prospect {
    /// Returns `true` if the prospect is in `stage`.
    #[must_use]
    pub fn is(&self, stage: PipelineStage) -> bool {
        self.status == Some(stage)
    }

    /// Returns the acquisition channel, treating an empty label as absent.
    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.acquisition_channel
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
