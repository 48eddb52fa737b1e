//! Content records shown by the screens
//!
//! These are the typed forms of what the services return. Wire formats are
//! parsed and validated in `services`; nothing here deals with missing fields.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// An audio track in the browser list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub audio_url: String,
    pub duration_secs: Option<u32>,
    pub artwork_url: Option<String>,
}

/// A book in the filtered book list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

/// A geocoded place returned by location search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn coordinates_label(&self) -> String {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        format!(
            "{:.4}°{} {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ayanamsa {
    #[default]
    Lahiri,
    Raman,
    Krishnamurti,
    FaganBradley,
    Tropical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    WholeSign,
    Placidus,
    Koch,
    Equal,
    Porphyry,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    #[default]
    NorthIndian,
    SouthIndian,
}

/// A closed set of choices shown as a picker.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn next(self) -> Self {
        let all = Self::ALL;
        let index = all.iter().position(|c| *c == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }

    fn prev(self) -> Self {
        let all = Self::ALL;
        let index = all.iter().position(|c| *c == self).unwrap_or(0);
        all[(index + all.len() - 1) % all.len()]
    }
}

impl Choice for Ayanamsa {
    const ALL: &'static [Self] = &[
        Ayanamsa::Lahiri,
        Ayanamsa::Raman,
        Ayanamsa::Krishnamurti,
        Ayanamsa::FaganBradley,
        Ayanamsa::Tropical,
    ];

    fn label(self) -> &'static str {
        match self {
            Ayanamsa::Lahiri => "Lahiri",
            Ayanamsa::Raman => "Raman",
            Ayanamsa::Krishnamurti => "Krishnamurti (KP)",
            Ayanamsa::FaganBradley => "Fagan/Bradley",
            Ayanamsa::Tropical => "Tropical (none)",
        }
    }
}

impl Choice for HouseSystem {
    const ALL: &'static [Self] = &[
        HouseSystem::WholeSign,
        HouseSystem::Placidus,
        HouseSystem::Koch,
        HouseSystem::Equal,
        HouseSystem::Porphyry,
    ];

    fn label(self) -> &'static str {
        match self {
            HouseSystem::WholeSign => "Whole sign",
            HouseSystem::Placidus => "Placidus",
            HouseSystem::Koch => "Koch",
            HouseSystem::Equal => "Equal",
            HouseSystem::Porphyry => "Porphyry",
        }
    }
}

impl Choice for ChartStyle {
    const ALL: &'static [Self] = &[ChartStyle::NorthIndian, ChartStyle::SouthIndian];

    fn label(self) -> &'static str {
        match self {
            ChartStyle::NorthIndian => "North Indian",
            ChartStyle::SouthIndian => "South Indian",
        }
    }
}

/// A saved user profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub birth_date: NaiveDate,
    pub birth_time: NaiveTime,
    pub birth_place: Place,
    #[serde(default)]
    pub ayanamsa: Ayanamsa,
    #[serde(default)]
    pub house_system: HouseSystem,
    #[serde(default)]
    pub chart_style: ChartStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_cycle_in_both_directions() {
        assert_eq!(Ayanamsa::Lahiri.next(), Ayanamsa::Raman);
        assert_eq!(Ayanamsa::Tropical.next(), Ayanamsa::Lahiri);
        assert_eq!(Ayanamsa::Lahiri.prev(), Ayanamsa::Tropical);
        assert_eq!(ChartStyle::SouthIndian.next(), ChartStyle::NorthIndian);
        assert_eq!(HouseSystem::Placidus.prev(), HouseSystem::WholeSign);
    }

    #[test]
    fn coordinates_label_uses_hemispheres() {
        let place = Place {
            name: "Lima".to_string(),
            latitude: -12.0464,
            longitude: -77.0428,
        };
        assert_eq!(place.coordinates_label(), "12.0464°S 77.0428°W");
    }

    #[test]
    fn profile_defaults_missing_astrology_settings() {
        let json = r#"{
            "name": "Asha",
            "birth_date": "1990-04-12",
            "birth_time": "06:30:00",
            "birth_place": {"name": "Pune", "latitude": 18.52, "longitude": 73.85}
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.ayanamsa, Ayanamsa::Lahiri);
        assert_eq!(profile.house_system, HouseSystem::WholeSign);
        assert_eq!(profile.chart_style, ChartStyle::NorthIndian);
    }
}
