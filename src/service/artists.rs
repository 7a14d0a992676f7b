//! Best-effort conversion of the search model's JSON into `Artist` records.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::core::json::extract_json;
use crate::models::{Artist, Coordinates};

/// Shape the model is asked for, with the aliases it actually sends.
///
/// Every field is kept as a raw `Value` so one badly typed field clears only itself instead of
/// dropping the whole entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArtist {
    #[serde(alias = "studio", alias = "artistName")]
    name: Option<Value>,
    #[serde(alias = "bio", alias = "summary")]
    description: Option<Value>,
    #[serde(alias = "location")]
    address: Option<Value>,
    coordinates: Option<Value>,
    #[serde(alias = "latitude")]
    lat: Option<Value>,
    #[serde(alias = "longitude", alias = "lon")]
    lng: Option<Value>,
    #[serde(alias = "styles")]
    specialties: Option<Value>,
    availability: Option<Value>,
    #[serde(alias = "portfolioLinks", alias = "links", alias = "website")]
    portfolio: Option<Value>,
}

impl RawArtist {
    fn into_artist(self) -> Option<Artist> {
        let name = text(self.name).filter(|n| !n.is_empty())?;
        let coordinates = self
            .coordinates
            .as_ref()
            .and_then(coordinate_pair)
            .or_else(|| Some((number(self.lat.as_ref()?)?, number(self.lng.as_ref()?)?)))
            .map(|(lat, lng)| Coordinates { lat, lng })
            .filter(|c| c.lat.is_finite() && c.lng.is_finite() && !(c.lat == 0.0 && c.lng == 0.0));

        Some(Artist {
            name,
            description: text(self.description).unwrap_or_default(),
            address: text(self.address).unwrap_or_default(),
            coordinates,
            specialties: string_list(self.specialties),
            availability: text(self.availability)
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            portfolio: string_list(self.portfolio),
        })
    }
}

/// Trimmed text of a scalar; `None` for null, lists and objects.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A number, or a string holding one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `{"lat", "lng"}` (or the long names), `[lat, lng]`, or `"lat, lng"`.
fn coordinate_pair(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Object(map) => {
            let lat = map.get("lat").or_else(|| map.get("latitude"))?;
            let lng = ["lng", "lon", "longitude"].iter().find_map(|key| map.get(*key))?;
            Some((number(lat)?, number(lng)?))
        }
        Value::Array(items) if items.len() == 2 => Some((number(&items[0])?, number(&items[1])?)),
        Value::String(s) => {
            let (lat, lng) = s.split_once(',')?;
            Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
        }
        _ => None,
    }
}

/// Accepts a list of strings, a single comma separated string, or nothing.
fn string_list(value: Option<Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse every usable artist out of a model reply.
///
/// Accepts a top-level array or an object holding an `artists` array. Entries that cannot be
/// read or have no name are skipped.
pub fn parse_artists(reply: &str) -> anyhow::Result<Vec<Artist>> {
    let value = extract_json(reply)
        .ok_or_else(|| anyhow::anyhow!("The artist search reply contained no JSON"))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("artists") {
            Some(Value::Array(entries)) => entries,
            _ => vec![Value::Object(map)],
        },
        _ => anyhow::bail!("The artist search reply was not a list of artists"),
    };

    let artists = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawArtist>(entry) {
            Ok(raw) => raw.into_artist(),
            Err(e) => {
                warn!("Skipping unreadable artist entry: {e}");
                None
            }
        })
        .collect();
    Ok(artists)
}
