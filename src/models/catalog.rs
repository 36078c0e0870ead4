use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Service level of a slot or booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    #[default]
    #[serde(alias = "normal", alias = "NORMAL")]
    Normal,
    #[serde(alias = "premium", alias = "PREMIUM")]
    Premium,
    #[serde(rename = "VIP", alias = "Vip", alias = "vip")]
    Vip,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Normal => "Normal",
            Tier::Premium => "Premium",
            Tier::Vip => "VIP",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Tier::Normal),
            "premium" => Ok(Tier::Premium),
            "vip" => Ok(Tier::Vip),
            _ => Err(format!("unknown tier: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCourt {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub recommended_court: Option<RecommendedCourt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub court_type: Option<String>,
    #[serde(default)]
    pub default_price: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// One bookable interval of a court on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub is_booked: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_wire_names() {
        assert_eq!(serde_json::to_string(&Tier::Vip).unwrap(), r#""VIP""#);
        let tier: Tier = serde_json::from_str(r#""Premium""#).unwrap();
        assert_eq!(tier, Tier::Premium);
        assert_eq!("vip".parse::<Tier>().unwrap(), Tier::Vip);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_slot_booked_flag() {
        let json = r#"{"id":42,"startTime":"08:00","endTime":"09:00","price":120000,"tier":"Normal","isBooked":true}"#;
        let slot: Slot = serde_json::from_str(json).unwrap();
        assert!(slot.is_booked);
        assert_eq!(slot.tier, Some(Tier::Normal));
    }

    #[test]
    fn test_facility_without_recommendation() {
        let json = r#"{"id":1,"name":"Riverside Arena"}"#;
        let facility: Facility = serde_json::from_str(json).unwrap();
        assert!(facility.recommended_court.is_none());
        assert!(facility.address.is_none());
    }

    #[test]
    fn test_court_type_field() {
        let json = r#"{"id":3,"name":"Court A","type":"Badminton","defaultPrice":80000}"#;
        let court: Court = serde_json::from_str(json).unwrap();
        assert_eq!(court.court_type.as_deref(), Some("Badminton"));
        assert!(court.is_active);
    }
}
