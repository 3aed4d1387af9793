//! Forecast base time-window resolution.
//!
//! The KMA short-term forecast is published on a fixed 3-hour cadence. Which
//! hours count as publication slots depends on the endpoint family, so the
//! grid rule is a deployment choice (`SlotConvention`), not hardcoded. The two
//! rules are close but not interchangeable: the issuance grid rolls back to
//! the previous day before 02:00, the aligned grid never does.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Publication hours for the issuance-aligned convention.
const ISSUANCE_HOURS: [u32; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Which 3-hour grid the provider publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotConvention {
    /// Slots at {02,05,08,11,14,17,20,23} hundred hours. Before 02:00 the
    /// most recent slot is yesterday's 2300.
    Issuance,
    /// Slots at {00,03,06,09,12,15,18,21} hundred hours, aligned to midnight.
    /// No day rollback.
    Grid,
}

impl FromStr for SlotConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "issuance" => Ok(SlotConvention::Issuance),
            "grid" => Ok(SlotConvention::Grid),
            other => Err(format!("unknown slot convention '{}'", other)),
        }
    }
}

/// The forecast batch a request should ask the provider for.
///
/// Derived purely from the wall clock; recomputed on every request, never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastSlot {
    pub base_date: NaiveDate,
    /// Hundred-hours, e.g. 2300 for the 23:00 slot.
    pub base_time: u32,
}

impl ForecastSlot {
    /// `base_date` query parameter (YYYYMMDD).
    pub fn base_date_param(&self) -> String {
        format!(
            "{:04}{:02}{:02}",
            self.base_date.year(),
            self.base_date.month(),
            self.base_date.day()
        )
    }

    /// `base_time` query parameter (HHMM, zero-padded).
    pub fn base_time_param(&self) -> String {
        format!("{:04}", self.base_time)
    }
}

/// Resolve the most recent published forecast slot for a wall-clock instant.
pub fn resolve_slot(now: NaiveDateTime, convention: SlotConvention) -> ForecastSlot {
    let hour = now.hour();

    match convention {
        SlotConvention::Issuance => {
            if hour < 2 {
                // Nothing published yet today; yesterday's last batch.
                ForecastSlot {
                    base_date: now.date() - chrono::Duration::days(1),
                    base_time: 2300,
                }
            } else {
                let slot_hour = ISSUANCE_HOURS
                    .iter()
                    .copied()
                    .filter(|&h| h <= hour)
                    .max()
                    .unwrap_or(2);
                ForecastSlot {
                    base_date: now.date(),
                    base_time: slot_hour * 100,
                }
            }
        }
        SlotConvention::Grid => ForecastSlot {
            base_date: now.date(),
            base_time: (hour / 3) * 3 * 100,
        },
    }
}
