use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Milliseconds since the Unix epoch, the timestamp unit used by stored records.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// A saved design together with the artist it was sent to and the conversation so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Design artwork as an image data URI
    pub design: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stencil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    pub saved_at: i64,
    #[serde(default)]
    pub conversation: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Contract>,
}

impl Project {
    pub fn new(design: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            design: design.into(),
            stencil: None,
            prompt: None,
            artist: None,
            saved_at: now_millis(),
            conversation: Vec::new(),
            contract: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_artist(mut self, artist: Artist) -> Self {
        self.artist = Some(artist);
        self
    }

    /// The saved description as a brief, for messages about this design.
    ///
    /// The style is the longest style name mentioned in the description, else the first of the
    /// artist's specialties that names a style, else traditional.
    pub fn brief(&self) -> Option<DesignBrief> {
        let description = self.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        let lowered = description.to_lowercase();
        let style = TattooStyle::ALL
            .into_iter()
            .filter(|style| lowered.contains(&style.label().to_lowercase()))
            .max_by_key(|style| style.label().len())
            .or_else(|| {
                self.artist.iter().flat_map(|a| a.specialties.iter()).find_map(|specialty| {
                    TattooStyle::ALL
                        .into_iter()
                        .find(|style| specialty.trim().eq_ignore_ascii_case(style.label()))
                })
            })
            .unwrap_or(TattooStyle::Traditional);
        Some(DesignBrief::new(description, style))
    }

    pub fn saved_at_display(&self) -> String {
        let nanos = self.saved_at as i128 * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .ok()
            .and_then(|ts| ts.format(&time::format_description::well_known::Rfc3339).ok())
            .unwrap_or_else(|| self.saved_at.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Artist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: i64,
}

impl Message {
    pub fn from_user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: now_millis(),
        }
    }

    pub fn from_artist(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Artist,
            text: text.into(),
            timestamp: now_millis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Pending,
    Approved,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContractStatus::Pending => "Pending",
            ContractStatus::Approved => "Approved",
            ContractStatus::InProgress => "In Progress",
            ContractStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "pending" => Ok(ContractStatus::Pending),
            "approved" => Ok(ContractStatus::Approved),
            "in progress" | "inprogress" => Ok(ContractStatus::InProgress),
            "completed" | "complete" => Ok(ContractStatus::Completed),
            other => Err(format!("unknown contract status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub status: ContractStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A tattoo artist as described by the search model. Every field is best effort.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artist {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub specialties: Vec<String>,
    pub availability: String,
    pub portfolio: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TattooStyle {
    Traditional,
    NeoTraditional,
    Realism,
    Blackwork,
    FineLine,
    Watercolor,
    Japanese,
    Geometric,
    Minimalist,
    Tribal,
}

impl TattooStyle {
    pub const ALL: [TattooStyle; 10] = [
        TattooStyle::Traditional,
        TattooStyle::NeoTraditional,
        TattooStyle::Realism,
        TattooStyle::Blackwork,
        TattooStyle::FineLine,
        TattooStyle::Watercolor,
        TattooStyle::Japanese,
        TattooStyle::Geometric,
        TattooStyle::Minimalist,
        TattooStyle::Tribal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TattooStyle::Traditional => "Traditional",
            TattooStyle::NeoTraditional => "Neo-Traditional",
            TattooStyle::Realism => "Realism",
            TattooStyle::Blackwork => "Blackwork",
            TattooStyle::FineLine => "Fine Line",
            TattooStyle::Watercolor => "Watercolor",
            TattooStyle::Japanese => "Japanese",
            TattooStyle::Geometric => "Geometric",
            TattooStyle::Minimalist => "Minimalist",
            TattooStyle::Tribal => "Tribal",
        }
    }

    /// Visual vocabulary handed to the image model for this style.
    pub fn descriptor(self) -> &'static str {
        match self {
            TattooStyle::Traditional => {
                "American traditional flash: bold black outlines, limited palette of red, yellow, green and black, solid shading"
            }
            TattooStyle::NeoTraditional => {
                "neo-traditional: bold varied line weight, rich jewel-tone colours, decorative ornamental details"
            }
            TattooStyle::Realism => "photorealistic black and grey realism with smooth gradients and fine detail",
            TattooStyle::Blackwork => "blackwork: heavy solid black fills, strong negative space, high contrast",
            TattooStyle::FineLine => "fine line: delicate single-needle linework, minimal shading, elegant and light",
            TattooStyle::Watercolor => "watercolor: soft colour washes and splashes bleeding beyond thin outlines",
            TattooStyle::Japanese => "Japanese irezumi: bold outlines, waves, wind bars, traditional motifs and flat colour",
            TattooStyle::Geometric => "geometric: precise lines, sacred geometry, dotwork and symmetric patterns",
            TattooStyle::Minimalist => "minimalist: very simple clean lines, small footprint, few elements",
            TattooStyle::Tribal => "tribal: flowing solid black shapes with sharp points and curves",
        }
    }
}

impl fmt::Display for TattooStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TattooStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        TattooStyle::ALL
            .into_iter()
            .find(|style| {
                style
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
                    == wanted
            })
            .ok_or_else(|| format!("unknown tattoo style: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    BlackAndGrey,
    Color,
}

/// What the user asked for on the describe step.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignBrief {
    pub description: String,
    pub style: TattooStyle,
    pub color: ColorMode,
    /// Body placement such as "forearm", if the user gave one
    pub placement: Option<String>,
}

impl DesignBrief {
    pub fn new(description: impl Into<String>, style: TattooStyle) -> Self {
        Self {
            description: description.into(),
            style,
            color: ColorMode::default(),
            placement: None,
        }
    }
}

/// One generated design offered on the choose step.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignCandidate {
    pub id: String,
    pub image: String,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_from_saved_description() {
        let project = Project::new("data:image/png;base64,AAAA").with_prompt("neo-traditional koi with peonies");
        let brief = project.brief().unwrap();
        assert_eq!(brief.description, "neo-traditional koi with peonies");
        assert_eq!(brief.style, TattooStyle::NeoTraditional);

        let artist = Artist {
            specialties: vec!["Fine Line".to_string()],
            ..Default::default()
        };
        let project = Project::new("data:image/png;base64,AAAA")
            .with_prompt("a small swallow")
            .with_artist(artist);
        assert_eq!(project.brief().map(|b| b.style), Some(TattooStyle::FineLine));

        assert!(Project::new("data:image/png;base64,AAAA").brief().is_none());
    }

    #[test]
    fn test_contract_status_uses_display_names_in_json() {
        let contract = Contract {
            status: ContractStatus::InProgress,
            price: Some(250.0),
            date: Some("2026-11-02".to_string()),
        };
        let json = serde_json::to_string(&contract).unwrap();
        assert!(json.contains(r#""status":"In Progress""#));

        let parsed: Contract = serde_json::from_str(r#"{"status":"Completed"}"#).unwrap();
        assert_eq!(parsed.status, ContractStatus::Completed);
        assert_eq!(parsed.price, None);
    }

    #[test]
    fn test_project_json_uses_camel_case_keys() {
        let mut project = Project::new("data:image/png;base64,AAAA");
        project.conversation.push(Message::from_user("Hi there"));
        let json = serde_json::to_value(&project).unwrap();

        assert!(json.get("savedAt").is_some());
        assert!(json.get("stencil").is_none());
        assert_eq!(json["conversation"][0]["sender"], "user");
    }

    #[test]
    fn test_style_parsing_ignores_case_and_punctuation() {
        assert_eq!("neo-traditional".parse(), Ok(TattooStyle::NeoTraditional));
        assert_eq!("FINE LINE".parse(), Ok(TattooStyle::FineLine));
        assert_eq!("fineline".parse(), Ok(TattooStyle::FineLine));
        assert!("cubist".parse::<TattooStyle>().is_err());
    }

    #[test]
    fn test_contract_status_from_cli_text() {
        assert_eq!("in-progress".parse(), Ok(ContractStatus::InProgress));
        assert_eq!("Approved".parse(), Ok(ContractStatus::Approved));
    }
}
