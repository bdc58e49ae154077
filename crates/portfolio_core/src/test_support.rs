use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{
    domain::{EducationId, UserId},
    error::ApiError,
    protocol::{
        CoverUploadData, CoverUploadResponse, CreateEducationRequest, DegreeListResponse,
        PortfolioDetailsResponse, UpdateEducationRequest, UserSummaryResponse,
        VerifyTokenResponse,
    },
};
use tokio::sync::{Mutex, Notify};

use crate::{
    error::{PortfolioError, Result},
    gateway::{CoverUpload, PortfolioApi},
};

/// Scriptable in-memory API. Every call is recorded as `"<op>:<arg>"`.
pub struct FakeApi {
    pub viewer: Option<String>,
    pub failing_users: Vec<String>,
    pub failing_details: Vec<String>,
    pub fail_upload: bool,
    pub fail_create: bool,
    pub fail_delete: bool,
    pub fail_degrees: bool,
    pub cover_url: Option<String>,
    pub educations: Value,
    pub gates: HashMap<String, Arc<Notify>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<CreateEducationRequest>>>,
    pub updated: Arc<Mutex<Vec<UpdateEducationRequest>>>,
}

impl FakeApi {
    pub fn ok() -> Self {
        Self {
            viewer: Some("viewer-1".into()),
            failing_users: Vec::new(),
            failing_details: Vec::new(),
            fail_upload: false,
            fail_create: false,
            fail_delete: false,
            fail_degrees: false,
            cover_url: Some("https://cdn.local/new-cover.png".into()),
            educations: json!([
                { "id": 1, "school": "First Uni", "fieldOfStudy": "Maths", "from": "2010", "to": "2014" },
                { "id": 2, "school": "Second Uni", "fieldOfStudy": "Physics", "from": "2015", "to": "2017", "degree": "MSc" }
            ]),
            gates: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            updated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn without_viewer(mut self) -> Self {
        self.viewer = None;
        self
    }

    pub fn failing_user(mut self, user_id: &str) -> Self {
        self.failing_users.push(user_id.to_string());
        self
    }

    pub fn failing_details(mut self, user_id: &str) -> Self {
        self.failing_details.push(user_id.to_string());
        self
    }

    /// Holds `get_user(user_id)` until the returned notify fires.
    pub fn gated(mut self, user_id: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(user_id.to_string(), Arc::clone(&gate));
        (self, gate)
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }

    fn unavailable(what: &str) -> PortfolioError {
        PortfolioError::Api(ApiError::new(503, format!("{what} unavailable")))
    }
}

#[async_trait]
impl PortfolioApi for FakeApi {
    async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse> {
        self.record(format!("verify:{token}")).await;
        let body = match &self.viewer {
            Some(id) => json!({ "data": { "user": { "id": id }, "newtoken": "refreshed" } }),
            None => json!({ "data": null }),
        };
        serde_json::from_value(body).map_err(|source| PortfolioError::Decode {
            what: "token verification",
            source,
        })
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserSummaryResponse> {
        self.record(format!("user:{user_id}")).await;
        if let Some(gate) = self.gates.get(user_id.as_str()) {
            gate.notified().await;
        }
        if self.failing_users.iter().any(|u| u == user_id.as_str()) {
            return Err(Self::unavailable("user service"));
        }
        serde_json::from_value(json!({
            "user": {
                "firstName": format!("first-{user_id}"),
                "lastName": "Doe",
                "profilePic": "https://cdn.local/avatar.png",
                "profileCoverPhoto": "https://cdn.local/cover.png"
            },
            "portfolio": { "city": "Lagos", "country": "Nigeria" },
            "tracks": ["backend"]
        }))
        .map_err(|source| PortfolioError::Decode {
            what: "user summary",
            source,
        })
    }

    async fn get_portfolio_details(&self, user_id: &UserId) -> Result<PortfolioDetailsResponse> {
        self.record(format!("details:{user_id}")).await;
        if self.failing_details.iter().any(|u| u == user_id.as_str()) {
            return Err(Self::unavailable("portfolio service"));
        }
        serde_json::from_value(json!({
            "about": { "owner": user_id.as_str() },
            "skills": ["rust"]
        }))
        .map_err(|source| PortfolioError::Decode {
            what: "portfolio details",
            source,
        })
    }

    async fn upload_cover(
        &self,
        user_id: &UserId,
        upload: CoverUpload,
    ) -> Result<CoverUploadResponse> {
        self.record(format!("upload:{user_id}:{}", upload.filename))
            .await;
        if self.fail_upload {
            return Err(Self::unavailable("upload service"));
        }
        Ok(CoverUploadResponse {
            data: Some(CoverUploadData {
                profile_pic: self.cover_url.clone(),
            }),
        })
    }

    async fn list_degrees(&self) -> Result<DegreeListResponse> {
        self.record("degrees".into()).await;
        if self.fail_degrees {
            return Err(Self::unavailable("degree service"));
        }
        serde_json::from_value(json!({ "data": [{ "id": 1, "type": "BSc" }, { "id": 2, "type": "MSc" }] }))
            .map_err(|source| PortfolioError::Decode {
                what: "degree list",
                source,
            })
    }

    async fn list_educations(&self, user_id: &UserId) -> Result<PortfolioDetailsResponse> {
        self.record(format!("educations:{user_id}")).await;
        Ok(PortfolioDetailsResponse {
            education: Some(self.educations.clone()),
            ..PortfolioDetailsResponse::default()
        })
    }

    async fn create_education(
        &self,
        user_id: &UserId,
        request: &CreateEducationRequest,
    ) -> Result<()> {
        self.record(format!("create:{user_id}")).await;
        if self.fail_create {
            return Err(Self::unavailable("education service"));
        }
        self.created.lock().await.push(request.clone());
        Ok(())
    }

    async fn update_education(
        &self,
        education_id: EducationId,
        request: &UpdateEducationRequest,
    ) -> Result<()> {
        self.record(format!("update:{}", education_id.0)).await;
        self.updated.lock().await.push(request.clone());
        Ok(())
    }

    async fn delete_education(&self, education_id: EducationId) -> Result<()> {
        self.record(format!("delete:{}", education_id.0)).await;
        if self.fail_delete {
            return Err(Self::unavailable("education service"));
        }
        Ok(())
    }
}
