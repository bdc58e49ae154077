//! Request and response shapes of the portfolio and auth REST endpoints.
//!
//! Every field the remote side may omit is optional; absent values normalize
//! to empty strings or JSON null on the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{DegreeOption, Education, SectionKind, UserId, UserProfile, UserSectionEntry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    #[serde(default)]
    pub data: Option<VerifyTokenData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyTokenData {
    #[serde(default)]
    pub user: Option<VerifiedUser>,
    #[serde(default)]
    pub newtoken: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifiedUser {
    #[serde(default)]
    pub id: Option<UserId>,
}

/// Viewer identity resolved from a stored token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: UserId,
    pub refreshed_token: Option<String>,
}

impl VerifyTokenResponse {
    pub fn into_identity(self) -> Option<ResolvedIdentity> {
        let data = self.data?;
        let user_id = data.user?.id?;
        Some(ResolvedIdentity {
            user_id,
            refreshed_token: data.newtoken,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSummaryResponse {
    #[serde(default)]
    pub user: Option<UserSummaryUser>,
    #[serde(default)]
    pub portfolio: Option<PortfolioLocation>,
    #[serde(default)]
    pub tracks: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryUser {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub profile_cover_photo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl UserSummaryResponse {
    pub fn into_profile(self) -> UserProfile {
        let user = self.user.unwrap_or_default();
        let portfolio = self.portfolio.unwrap_or_default();
        UserProfile {
            first_name: user.first_name.unwrap_or_default(),
            last_name: user.last_name.unwrap_or_default(),
            avatar_image: user.profile_pic.unwrap_or_default(),
            cover_image: user.profile_cover_photo.unwrap_or_default(),
            city: portfolio.city.unwrap_or_default(),
            country: portfolio.country.unwrap_or_default(),
            tracks: self.tracks.unwrap_or_default(),
        }
    }
}

/// Flat object keyed by section id, one key per [`SectionKind`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDetailsResponse {
    #[serde(default)]
    pub about: Option<Value>,
    #[serde(default)]
    pub projects: Option<Value>,
    #[serde(default)]
    pub work_experience: Option<Value>,
    #[serde(default)]
    pub education: Option<Value>,
    #[serde(default)]
    pub skills: Option<Value>,
    #[serde(default)]
    pub interests: Option<Value>,
    #[serde(default)]
    pub awards: Option<Value>,
    #[serde(default)]
    pub certificate: Option<Value>,
    #[serde(default)]
    pub language: Option<Value>,
    #[serde(default)]
    pub reference: Option<Value>,
    #[serde(default)]
    pub shop: Option<Value>,
    #[serde(default)]
    pub contact: Option<Value>,
    #[serde(default)]
    pub custom: Option<Value>,
}

impl PortfolioDetailsResponse {
    fn take(&mut self, kind: SectionKind) -> Value {
        let slot = match kind {
            SectionKind::About => &mut self.about,
            SectionKind::Projects => &mut self.projects,
            SectionKind::WorkExperience => &mut self.work_experience,
            SectionKind::Education => &mut self.education,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Interests => &mut self.interests,
            SectionKind::Awards => &mut self.awards,
            SectionKind::Certificate => &mut self.certificate,
            SectionKind::Language => &mut self.language,
            SectionKind::Reference => &mut self.reference,
            SectionKind::Shop => &mut self.shop,
            SectionKind::Contact => &mut self.contact,
            SectionKind::Custom => &mut self.custom,
        };
        slot.take().unwrap_or(Value::Null)
    }

    /// Rebuilds the 13-entry user section list in display order.
    pub fn into_user_sections(mut self) -> Vec<UserSectionEntry> {
        SectionKind::ALL
            .into_iter()
            .map(|kind| UserSectionEntry {
                title: kind.entry_title().to_string(),
                id: kind.id().to_string(),
                data: self.take(kind),
            })
            .collect()
    }

    /// Education records, skipping entries that do not match the record shape.
    pub fn educations(&self) -> Vec<Education> {
        match &self.education {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverUploadResponse {
    #[serde(default)]
    pub data: Option<CoverUploadData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverUploadData {
    #[serde(default)]
    pub profile_pic: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DegreeListResponse {
    #[serde(default)]
    pub data: Option<Vec<DegreeRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeRecord {
    pub id: Value,
    #[serde(rename = "type")]
    pub kind: Value,
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl DegreeListResponse {
    pub fn into_options(self) -> Option<Vec<DegreeOption>> {
        self.data.map(|records| {
            records
                .iter()
                .map(|record| DegreeOption {
                    id: value_to_string(&record.id),
                    kind: value_to_string(&record.kind),
                })
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEducationRequest {
    pub field_of_study: String,
    #[serde(rename = "degree_id")]
    pub degree_id: i64,
    pub school: String,
    pub description: String,
    pub from: String,
    pub to: String,
    pub user_id: UserId,
    #[serde(rename = "section_id")]
    pub section_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEducationRequest {
    pub degree: String,
    pub field_of_study: String,
    pub id: i64,
    pub school: String,
    pub description: String,
    pub from: String,
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_summary_normalizes_missing_fields_to_empty() {
        let response: UserSummaryResponse = serde_json::from_value(json!({
            "user": { "firstName": "Ada", "profilePic": "a.png" },
            "tracks": ["design"]
        }))
        .expect("decode");
        let profile = response.into_profile();
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "");
        assert_eq!(profile.avatar_image, "a.png");
        assert_eq!(profile.city, "");
        assert_eq!(profile.tracks, vec![json!("design")]);
    }

    #[test]
    fn portfolio_details_always_yield_thirteen_entries() {
        let response: PortfolioDetailsResponse = serde_json::from_value(json!({
            "workExperience": [{ "role": "engineer" }],
            "custom": { "title": "x" }
        }))
        .expect("decode");
        let entries = response.into_user_sections();
        assert_eq!(entries.len(), 13);
        assert_eq!(entries[1].title, "Project");
        assert_eq!(entries[2].id, "workExperience");
        assert_eq!(entries[2].data, json!([{ "role": "engineer" }]));
        assert_eq!(entries[0].data, Value::Null);
        assert_eq!(entries[12].id, "custom");
    }

    #[test]
    fn verify_response_without_user_id_has_no_identity() {
        let response: VerifyTokenResponse =
            serde_json::from_value(json!({ "data": { "newtoken": "t" } })).expect("decode");
        assert!(response.into_identity().is_none());
    }

    #[test]
    fn degree_ids_are_stringified() {
        let response: DegreeListResponse = serde_json::from_value(json!({
            "data": [{ "id": 3, "type": "BSc" }]
        }))
        .expect("decode");
        let options = response.into_options().expect("options");
        assert_eq!(
            options,
            vec![DegreeOption {
                id: "3".into(),
                kind: "BSc".into()
            }]
        );
    }

    #[test]
    fn create_education_uses_mixed_case_wire_keys() {
        let body = serde_json::to_value(CreateEducationRequest {
            field_of_study: "CS".into(),
            degree_id: 2,
            school: "Uni".into(),
            description: "d".into(),
            from: "2019".into(),
            to: "2023".into(),
            user_id: UserId::from("u1"),
            section_id: 2,
        })
        .expect("encode");
        assert_eq!(body["fieldOfStudy"], "CS");
        assert_eq!(body["degree_id"], 2);
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["section_id"], 2);
    }
}
