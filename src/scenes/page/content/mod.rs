use std::fmt;

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Clone, Copy)]
pub enum PortfolioDocument {
    Main,
}

impl PortfolioDocument {
    pub fn content(&self) -> &str {
        match self {
            PortfolioDocument::Main => include_str!("./portfolio.json"),
        }
    }
}

#[derive(Debug)]
pub enum ContentError {
    Parse(serde_json::Error),
    Empty(&'static str),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Parse(error) => write!(f, "portfolio content is not valid: {error}"),
            ContentError::Empty(field) => write!(f, "portfolio content has no `{field}` entries"),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Parse(error) => Some(error),
            ContentError::Empty(_) => None,
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(error: serde_json::Error) -> Self {
        ContentError::Parse(error)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct CoverContent {
    pub title: String,
    pub subtitle: String,
    pub tagline: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WizardStepContent {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExpertiseItem {
    pub title: String,
    pub summary: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ConnectLink {
    pub label: String,
    pub url: String,
}

/// Text shown on the page, loaded once at startup.
#[derive(Resource, Deserialize, Clone, Debug)]
pub struct PortfolioContent {
    pub cover: CoverContent,
    pub wizard: Vec<WizardStepContent>,
    pub expertise: Vec<ExpertiseItem>,
    pub skills: Vec<String>,
    pub connect: Vec<ConnectLink>,
    pub footer: String,
}

impl PortfolioContent {
    pub fn from_document(document: PortfolioDocument) -> Result<Self, ContentError> {
        Self::parse(document.content())
    }

    pub fn parse(source: &str) -> Result<Self, ContentError> {
        let content: Self = serde_json::from_str(source)?;
        if content.wizard.is_empty() {
            return Err(ContentError::Empty("wizard"));
        }
        Ok(content)
    }

    pub fn load(document: PortfolioDocument) -> Self {
        match Self::from_document(document) {
            Ok(content) => content,
            Err(error) => {
                warn!("failed to load portfolio content: {error}; using safe defaults");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self {
            cover: CoverContent {
                title: String::from("PORTFOLIO"),
                subtitle: String::from("Content unavailable"),
                tagline: String::from("Press Esc to return to the top."),
            },
            wizard: vec![WizardStepContent {
                title: String::from("Welcome"),
                lines: vec![String::from("Click Finish to continue.")],
            }],
            expertise: Vec::new(),
            skills: Vec::new(),
            connect: Vec::new(),
            footer: String::new(),
        }
    }
}

impl Default for PortfolioContent {
    fn default() -> Self {
        Self::load(PortfolioDocument::Main)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_document_parses() {
        let content = PortfolioContent::from_document(PortfolioDocument::Main)
            .expect("bundled content parses");
        assert_eq!(content.wizard.len(), 4);
        assert!(!content.skills.is_empty());
        assert!(!content.expertise.is_empty());
    }

    #[test]
    fn wizard_without_steps_is_rejected() {
        let source = r#"{
            "cover": {"title": "t", "subtitle": "s", "tagline": "g"},
            "wizard": [],
            "expertise": [],
            "skills": [],
            "connect": [],
            "footer": ""
        }"#;
        assert!(matches!(
            PortfolioContent::parse(source),
            Err(ContentError::Empty("wizard"))
        ));
        assert!(matches!(
            PortfolioContent::parse("{"),
            Err(ContentError::Parse(_))
        ));
    }
}
