//! Localized labels and warning text
//!
//! Finnish and English dictionaries for the calculator view.

use serde::{Deserialize, Serialize};

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fi,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fi => "fi",
            Language::En => "en",
        }
    }

    /// Parse a stored language code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "fi" => Some(Language::Fi),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Pick a language from a locale tag such as `en_US.UTF-8` or `fi-FI`.
    /// Anything unrecognized falls back to Finnish.
    pub fn detect(locale: &str) -> Self {
        let lower = locale.trim().to_lowercase();
        if lower.starts_with("fi") {
            Language::Fi
        } else if lower.starts_with("en") {
            Language::En
        } else {
            Language::Fi
        }
    }

    /// Detect from the `LANG` environment variable
    pub fn detect_from_env() -> Self {
        std::env::var("LANG")
            .map(|l| Self::detect(&l))
            .unwrap_or(Language::Fi)
    }

    pub fn toggle(&self) -> Self {
        match self {
            Language::Fi => Language::En,
            Language::En => Language::Fi,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::Fi => &FI,
            Language::En => &EN,
        }
    }
}

/// Warning messages shown next to the results
#[derive(Debug, Serialize)]
pub struct Warnings {
    pub enter_weight: &'static str,
    pub enter_rate_or_dose: &'static str,
    pub not_positive: &'static str,
    pub out_of_range: &'static str,
}

/// Label set for one language
#[derive(Debug, Serialize)]
pub struct Strings {
    pub title: &'static str,
    pub drug: &'static str,
    pub weight: &'static str,
    pub rate: &'static str,
    pub target_dose: &'static str,
    pub or: &'static str,
    pub calculated_rate: &'static str,
    pub calculated_doses: &'static str,
    pub recommended: &'static str,
    pub clear_all: &'static str,
    pub warnings: Warnings,
}

pub static FI: Strings = Strings {
    title: "Infuusiolaskuri",
    drug: "Lääke",
    weight: "Paino",
    rate: "Nopeus",
    target_dose: "Tavoitettu annos",
    or: "tai",
    calculated_rate: "Laskettu nopeus",
    calculated_doses: "Laskettu annokset",
    recommended: "Suositus",
    clear_all: "Tyhjennä kaikki",
    warnings: Warnings {
        enter_weight: "Syötä paino",
        enter_rate_or_dose: "Syötä nopeus tai annos",
        not_positive: "Nopeuden ja annoksen on oltava positiivisia",
        out_of_range: "Annos on suosituksen ulkopuolella",
    },
};

pub static EN: Strings = Strings {
    title: "Infusion Calculator",
    drug: "Drug",
    weight: "Weight",
    rate: "Rate",
    target_dose: "Target dose",
    or: "or",
    calculated_rate: "Calculated rate",
    calculated_doses: "Calculated doses",
    recommended: "Recommended range",
    clear_all: "Clear all",
    warnings: Warnings {
        enter_weight: "Enter weight",
        enter_rate_or_dose: "Enter rate or dose",
        not_positive: "Rate and dose must be positive",
        out_of_range: "Dose is outside the recommended range",
    },
};
