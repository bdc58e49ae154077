use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(UserId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EducationId(pub i64);

/// The fixed set of portfolio section kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    About,
    Projects,
    WorkExperience,
    Education,
    Skills,
    Interests,
    Awards,
    Certificate,
    Language,
    Reference,
    Shop,
    Contact,
    Custom,
}

impl SectionKind {
    pub const ALL: [SectionKind; 13] = [
        SectionKind::About,
        SectionKind::Projects,
        SectionKind::WorkExperience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Interests,
        SectionKind::Awards,
        SectionKind::Certificate,
        SectionKind::Language,
        SectionKind::Reference,
        SectionKind::Shop,
        SectionKind::Contact,
        SectionKind::Custom,
    ];

    /// Wire identifier, also the key used by the visibility map.
    pub fn id(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Projects => "projects",
            Self::WorkExperience => "workExperience",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Interests => "interests",
            Self::Awards => "awards",
            Self::Certificate => "certificate",
            Self::Language => "language",
            Self::Reference => "reference",
            Self::Shop => "shop",
            Self::Contact => "contact",
            Self::Custom => "custom",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Projects => "Projects",
            Self::WorkExperience => "Work Experience",
            Self::Education => "Education",
            Self::Skills => "Skills",
            Self::Interests => "Interests",
            Self::Awards => "Awards",
            Self::Certificate => "Certificate",
            Self::Language => "Language",
            Self::Reference => "Reference",
            Self::Shop => "Shop",
            Self::Contact => "Contact",
            Self::Custom => "Custom",
        }
    }

    /// Label used for the normalized user-section list. Differs from the
    /// catalog title only for projects.
    pub fn entry_title(self) -> &'static str {
        match self {
            Self::Projects => "Project",
            other => other.title(),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Section {
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            data: None,
        }
    }
}

impl From<SectionKind> for Section {
    fn from(kind: SectionKind) -> Self {
        Section::new(kind.title(), kind.id())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub avatar_image: String,
    pub cover_image: String,
    pub city: String,
    pub country: String,
    pub tracks: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSectionEntry {
    pub title: String,
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeOption {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EducationId,
    #[serde(default)]
    pub degree: Option<Value>,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}
