//! Content Store: the JSON document every page section is rendered from.
//!
//! ```json
//! {
//!   "personalInfo": { "name": "Ana", "pageTitle": "Ana // Portfolio", "aboutText": ["..."] },
//!   "navigation": [{ "text": "Sobre", "target": "about" }],
//!   "windows": { "about": { "title": "about.exe", "heading": "Quem sou" } },
//!   "projects": [{ "id": "proj1", "status": "publico", "menu_title": "Proj One", ... }]
//! }
//! ```
//!
//! Loaded once per bootstrap and never mutated afterwards.

pub(crate) mod load;

pub use load::{ContentError, ContentSource, load_site_data};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Root of the content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    pub personal_info: PersonalInfo,
    pub navigation: Vec<NavItem>,
    /// Window id → window content. Ids outside `desktop.windows` are ignored.
    pub windows: BTreeMap<String, WindowContent>,
    pub projects: Vec<Project>,
}

impl SiteData {
    /// Parse the content file and run shape validation.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let data: SiteData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Projects shown in the list and detail view, in source order.
    pub fn visible_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.status.is_public())
    }

    pub fn window(&self, id: &str) -> Option<&WindowContent> {
        self.windows.get(id)
    }

    /// Project ids must be unique, usable DOM ids.
    fn validate(&self) -> Result<(), ContentError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for project in &self.projects {
            if !is_valid_dom_id(&project.id) {
                return Err(ContentError::Invalid(format!(
                    "project id `{}` is not a valid element id",
                    project.id
                )));
            }
            if !seen.insert(project.id.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "project id `{}` is used more than once",
                    project.id
                )));
            }
        }
        Ok(())
    }
}

/// An element id: non-empty, no whitespace, nothing that needs escaping.
pub fn is_valid_dom_id(id: &str) -> bool {
    !id.is_empty()
        && !id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&' | '#'))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    pub page_title: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub about_text: Vec<String>,
}

/// Menu entry that opens a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub text: String,
    pub target: String,
}

/// Text of one fixed window. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub text: Option<Vec<String>>,
    #[serde(default)]
    pub links: Option<Vec<ContactLink>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub menu_title: String,
    pub page_title: String,
    pub status: ProjectStatus,
    pub summary: Vec<String>,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    #[serde(default)]
    pub findings: Vec<String>,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub code_type: Option<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// Visual class, e.g. `principal`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub url: String,
    pub text: String,
}

/// Publication status. `publico` and `public` are public; any other value
/// is kept verbatim and never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStatus {
    Public,
    Other(String),
}

impl ProjectStatus {
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Public => "publico",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "publico" | "public" => Self::Public,
            _ => Self::Other(s),
        }
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
