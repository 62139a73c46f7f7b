//! Location Resolution Module
//!
//! Turns a raw postal or ZIP code into a region and district classification.
//! Classification is a best-effort heuristic: unrecognisable input falls back
//! to the default classification instead of failing the calculation.

use crate::models::{DistrictType, LocationClassification, RegionCategory};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Canadian postal code, e.g. "K1A 0A6" or "M5V3L9"
static CANADIAN_POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d[A-Z]\s?\d[A-Z]\d$").unwrap());

/// US ZIP or ZIP+4, e.g. "12345" or "12345-6789"
static US_ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{5})(-\d{4})?$").unwrap());

/// Kind of code recognised in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostalCodeKind {
    Canadian,
    UsZip(u32),
    /// Not a well-formed code, but it contains digits
    Digits(u64),
    Unrecognized,
}

/// Service for classifying postal codes
pub struct LocationResolver;

impl LocationResolver {
    /// Recognise the shape of a postal code
    #[must_use]
    pub fn detect(postal_code: &str) -> PostalCodeKind {
        let normalized = postal_code.trim().to_uppercase();

        if CANADIAN_POSTAL_RE.is_match(&normalized) {
            return PostalCodeKind::Canadian;
        }

        if let Some(zip) = US_ZIP_RE
            .captures(&normalized)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        {
            return PostalCodeKind::UsZip(zip);
        }

        let digits: String = normalized.chars().filter(char::is_ascii_digit).collect();
        match digits.parse::<u64>() {
            Ok(number) => PostalCodeKind::Digits(number),
            Err(_) => PostalCodeKind::Unrecognized,
        }
    }

    /// Classify a postal code into region and district. Never fails.
    #[must_use]
    pub fn classify(postal_code: &str) -> LocationClassification {
        let classification = match Self::detect(postal_code) {
            PostalCodeKind::Canadian => {
                LocationClassification::new(RegionCategory::Canadian, DistrictType::Suburban)
            }
            PostalCodeKind::UsZip(zip) => Self::classify_number(u64::from(zip)),
            PostalCodeKind::Digits(number) => {
                debug!("'{}' is not a ZIP code, classifying by its digits", postal_code);
                Self::classify_number(number)
            }
            PostalCodeKind::Unrecognized => {
                debug!("Unrecognized postal code '{}', using default classification", postal_code);
                LocationClassification::default()
            }
        };

        debug!(
            "Classified '{}' as {} / {}",
            postal_code, classification.region, classification.district
        );
        classification
    }

    fn classify_number(number: u64) -> LocationClassification {
        LocationClassification::new(Self::region_for(number), Self::district_for(number))
    }

    fn region_for(number: u64) -> RegionCategory {
        match number {
            30000..=39999 | 70000..=79999 | 85000..=88999 => RegionCategory::SouthernUs,
            _ => RegionCategory::NorthernUs,
        }
    }

    fn district_for(number: u64) -> DistrictType {
        match number {
            0..=9999 | 59000..=59999 => DistrictType::Rural,
            10000..=19999 | 90000..=99999 => DistrictType::Urban,
            _ => DistrictType::Suburban,
        }
    }
}
