//! Derived view of a [`ClaimSession`], shared by the TUI and one-shot output.
//!
//! Nothing here is stored; [`view`] recomputes the whole screen from the
//! session every time it is called.
use crate::session::{ClaimSession, UiState};
use crate::types::{BannerCategory, ClaimResult};
use std::fmt::{self, Write as _};

pub const TITLE: &str = "Misinformation Checker";
pub const SUBTITLE: &str =
    "Enter a claim below to check its accuracy using real-time web search and AI analysis";
pub const SUBMIT_LABEL: &str = "Check Claim";
pub const SUBMIT_LABEL_LOADING: &str = "Checking Claim...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub input: String,
    pub submit: SubmitControl,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: &'static str,
    pub enabled: bool,
}

/// What sits below the input controls. Never both an error and a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Error(String),
    Result(ResultView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub banner: Banner,
    pub sections: Vec<Section>,
}

impl ResultView {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub category: BannerCategory,
    pub prefix: &'static str,
    pub verdict: String,
    pub confidence: Option<String>,
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.verdict)?;
        if let Some(confidence) = &self.confidence {
            write!(f, " (Confidence: {confidence})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Explanation,
    Context,
    WhyMisinfo,
    Sources,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub content: SectionContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    Text(String),
    /// Literal URLs, in backend order.
    Links(Vec<String>),
}

/// Compute the screen for the current session.
///
/// ```
/// use claimcheck_client::render::{self, Body};
/// use claimcheck_client::ClaimSession;
///
/// let screen = render::view(&ClaimSession::new());
/// assert_eq!(screen.body, Body::Empty);
/// assert!(!screen.submit.enabled);
/// assert_eq!(screen.submit.label, "Check Claim");
/// ```
pub fn view(session: &ClaimSession) -> Screen {
    let loading = session.state().is_loading();
    let submit = SubmitControl {
        label: if loading {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        },
        enabled: session.can_submit(),
    };
    let body = match session.state() {
        UiState::Idle | UiState::Loading => Body::Empty,
        UiState::Failed(message) => Body::Error(message.clone()),
        UiState::Success(result) => Body::Result(result_view(result)),
    };
    Screen {
        input: session.claim_text().to_string(),
        submit,
        body,
    }
}

pub fn result_view(result: &ClaimResult) -> ResultView {
    let kind = result.verdict_kind();
    let banner = Banner {
        category: result.banner_category(),
        prefix: kind.map(|k| k.banner_prefix()).unwrap_or(""),
        verdict: result.verdict.clone().unwrap_or_default(),
        confidence: result.confidence.clone(),
    };

    let mut sections = vec![Section {
        kind: SectionKind::Explanation,
        heading: kind.map(|k| k.explanation_heading()).unwrap_or(""),
        content: SectionContent::Text(result.explanation.clone()),
    }];
    if let Some(context) = &result.context {
        sections.push(Section {
            kind: SectionKind::Context,
            heading: "Background & Context:",
            content: SectionContent::Text(context.clone()),
        });
    }
    if let Some(note) = result.misinfo_note() {
        sections.push(Section {
            kind: SectionKind::WhyMisinfo,
            heading: "Why This Misinformation Spreads:",
            content: SectionContent::Text(note.to_string()),
        });
    }
    if let Some(sources) = result.cited_sources() {
        sections.push(Section {
            kind: SectionKind::Sources,
            heading: "Sources:",
            content: SectionContent::Links(sources.to_vec()),
        });
    }

    ResultView { banner, sections }
}

/// Plain-text rendering of the body, used by one-shot mode.
pub fn body_text(body: &Body) -> String {
    let mut out = String::new();
    match body {
        Body::Empty => {}
        Body::Error(message) => {
            let _ = writeln!(out, "Error: {message}");
        }
        Body::Result(view) => {
            let _ = writeln!(out, "{}", view.banner);
            for section in &view.sections {
                out.push('\n');
                if !section.heading.is_empty() {
                    let _ = writeln!(out, "{}", section.heading);
                }
                match &section.content {
                    SectionContent::Text(text) => {
                        for line in text.lines() {
                            let _ = writeln!(out, "  {line}");
                        }
                    }
                    SectionContent::Links(links) => {
                        for link in links {
                            let _ = writeln!(out, "  - {link}");
                        }
                    }
                }
            }
        }
    }
    out
}
