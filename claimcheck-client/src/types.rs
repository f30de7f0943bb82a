use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /check`. Only constructible from a non-empty trimmed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimRequest {
    claim: String,
}

impl ClaimRequest {
    /// Trim `raw`; `None` when nothing is left.
    ///
    /// ```
    /// use claimcheck_client::ClaimRequest;
    ///
    /// let req = ClaimRequest::new("  The Earth is flat \n").unwrap();
    /// assert_eq!(req.claim(), "The Earth is flat");
    /// assert!(ClaimRequest::new(" \t ").is_none());
    /// ```
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            claim: trimmed.to_string(),
        })
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }
}

/// Structured verdict returned by the backend on a 2xx response.
///
/// Optional text fields that arrive as `null`, `""`, `0` or `false` are
/// treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    /// Opaque certainty indicator; numbers are kept in their textual form.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    pub explanation: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub why_misinfo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl ClaimResult {
    pub fn banner_category(&self) -> BannerCategory {
        BannerCategory::from_verdict(self.verdict.as_deref())
    }

    /// Case-sensitive match used for headings.
    pub fn verdict_kind(&self) -> Option<VerdictKind> {
        VerdictKind::exact(self.verdict.as_deref())
    }

    /// The misinformation note only counts for an exact `"Fake"` verdict.
    pub fn misinfo_note(&self) -> Option<&str> {
        match self.verdict_kind() {
            Some(VerdictKind::Fake) => self.why_misinfo.as_deref(),
            _ => None,
        }
    }

    /// Cited sources, or `None` when there are none to show.
    pub fn cited_sources(&self) -> Option<&[String]> {
        self.sources.as_deref().filter(|s| !s.is_empty())
    }
}

fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        // Zero and `false` are falsy on the wire, so they count as absent too.
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(false)) => Ok(None),
        Some(Value::Bool(true)) => Ok(Some(true.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected text or number, found {other}"
        ))),
    }
}

/// Visual style of the verdict banner. Chosen case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerCategory {
    Real,
    Fake,
    Unverified,
    Default,
}

impl BannerCategory {
    /// ```
    /// use claimcheck_client::BannerCategory;
    ///
    /// assert_eq!(BannerCategory::from_verdict(Some("FAKE")), BannerCategory::Fake);
    /// assert_eq!(BannerCategory::from_verdict(Some("Misleading")), BannerCategory::Default);
    /// assert_eq!(BannerCategory::from_verdict(None), BannerCategory::Default);
    /// ```
    pub fn from_verdict(verdict: Option<&str>) -> Self {
        match verdict.map(str::to_lowercase).as_deref() {
            Some("real") => Self::Real,
            Some("fake") => Self::Fake,
            Some("unverified") => Self::Unverified,
            _ => Self::Default,
        }
    }
}

/// Verdicts recognised by exact, case-sensitive comparison.
///
/// Deliberately stricter than [`BannerCategory`]: `"fake"` styles the banner
/// as fake but gets no heading prefix and no misinformation section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    Fake,
    Real,
    Unverified,
}

impl VerdictKind {
    pub fn exact(verdict: Option<&str>) -> Option<Self> {
        match verdict? {
            "Fake" => Some(Self::Fake),
            "Real" => Some(Self::Real),
            "Unverified" => Some(Self::Unverified),
            _ => None,
        }
    }

    pub fn banner_prefix(self) -> &'static str {
        match self {
            Self::Fake => "CLAIM REJECTED: ",
            Self::Real => "CLAIM VERIFIED: ",
            Self::Unverified => "CLAIM UNVERIFIED: ",
        }
    }

    pub fn explanation_heading(self) -> &'static str {
        match self {
            Self::Fake => "Why This Claim is False:",
            Self::Real => "Evidence Supporting This Claim:",
            Self::Unverified => "Analysis:",
        }
    }
}
