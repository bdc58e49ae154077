//! REST access to the auth service and the portfolio API.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{EducationId, UserId},
    error::ApiError,
    protocol::{
        CoverUploadResponse, CreateEducationRequest, DegreeListResponse,
        PortfolioDetailsResponse, UpdateEducationRequest, UserSummaryResponse,
        VerifyTokenResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    config::Settings,
    error::{PortfolioError, Result},
};

/// Image chosen for the cover slot.
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait PortfolioApi: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse>;
    async fn get_user(&self, user_id: &UserId) -> Result<UserSummaryResponse>;
    async fn get_portfolio_details(&self, user_id: &UserId) -> Result<PortfolioDetailsResponse>;
    async fn upload_cover(
        &self,
        user_id: &UserId,
        upload: CoverUpload,
    ) -> Result<CoverUploadResponse>;
    async fn list_degrees(&self) -> Result<DegreeListResponse>;
    async fn list_educations(&self, user_id: &UserId) -> Result<PortfolioDetailsResponse>;
    async fn create_education(
        &self,
        user_id: &UserId,
        request: &CreateEducationRequest,
    ) -> Result<()>;
    async fn update_education(
        &self,
        education_id: EducationId,
        request: &UpdateEducationRequest,
    ) -> Result<()>;
    async fn delete_education(&self, education_id: EducationId) -> Result<()>;
}

pub struct HttpPortfolioApi {
    http: Client,
    api_base: Url,
    auth_base: Url,
}

impl HttpPortfolioApi {
    pub fn new(api_base: Url, auth_base: Url) -> Self {
        Self {
            http: Client::new(),
            api_base,
            auth_base,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.api_base()?, settings.auth_base()?))
    }
}

/// Joins `path` onto `base` and appends `tail` as a single escaped segment.
fn endpoint(base: &Url, path: &str, tail: Option<&str>) -> Result<Url> {
    let mut url = base.join(path)?;
    if let Some(tail) = tail {
        url.path_segments_mut()
            .map_err(|_| PortfolioError::InvalidBaseUrl(base.to_string()))?
            .pop_if_empty()
            .push(tail);
    }
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &'static str) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::from_body(status.as_u16(), &body).into());
    }
    serde_json::from_str(&body).map_err(|source| PortfolioError::Decode { what, source })
}

async fn expect_success(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_body(status.as_u16(), &body).into())
}

impl HttpPortfolioApi {
    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &'static str) -> Result<T> {
        debug!(%url, what, "gateway: GET");
        let response = self.http.get(url).send().await?;
        read_json(response, what).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &B,
    ) -> Result<()> {
        debug!(%url, %method, "gateway: send");
        let response = self.http.request(method, url).json(body).send().await?;
        expect_success(response).await
    }
}

#[async_trait]
impl PortfolioApi for HttpPortfolioApi {
    async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse> {
        let url = endpoint(&self.auth_base, "api/auth/verify/", Some(token))?;
        self.get_json(url, "token verification").await
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserSummaryResponse> {
        let url = endpoint(&self.api_base, "api/users/", Some(user_id.as_str()))?;
        self.get_json(url, "user summary").await
    }

    async fn get_portfolio_details(&self, user_id: &UserId) -> Result<PortfolioDetailsResponse> {
        let url = endpoint(
            &self.api_base,
            "api/getPortfolioDetails/",
            Some(user_id.as_str()),
        )?;
        self.get_json(url, "portfolio details").await
    }

    async fn upload_cover(
        &self,
        user_id: &UserId,
        upload: CoverUpload,
    ) -> Result<CoverUploadResponse> {
        let url = endpoint(&self.api_base, "api/profile/cover/upload", None)?;
        let mut part = Part::bytes(upload.bytes).file_name(upload.filename);
        if let Some(mime) = upload.mime_type.as_deref() {
            part = part.mime_str(mime)?;
        }
        let form = Form::new()
            .part("images", part)
            .text("userId", user_id.to_string());
        debug!(%url, user_id = %user_id, "gateway: POST cover upload");
        let response = self.http.post(url).multipart(form).send().await?;
        read_json(response, "cover upload").await
    }

    async fn list_degrees(&self) -> Result<DegreeListResponse> {
        let url = endpoint(&self.api_base, "api/v1/degree", None)?;
        self.get_json(url, "degree list").await
    }

    async fn list_educations(&self, user_id: &UserId) -> Result<PortfolioDetailsResponse> {
        let url = endpoint(
            &self.api_base,
            "api/v1/getPortfolioDetails/",
            Some(user_id.as_str()),
        )?;
        self.get_json(url, "education list").await
    }

    async fn create_education(
        &self,
        user_id: &UserId,
        request: &CreateEducationRequest,
    ) -> Result<()> {
        let url = endpoint(&self.api_base, "api/v1/education/", Some(user_id.as_str()))?;
        self.send_json(reqwest::Method::POST, url, request).await
    }

    async fn update_education(
        &self,
        education_id: EducationId,
        request: &UpdateEducationRequest,
    ) -> Result<()> {
        let url = endpoint(
            &self.api_base,
            "api/v1/education/",
            Some(&education_id.0.to_string()),
        )?;
        self.send_json(reqwest::Method::PATCH, url, request).await
    }

    async fn delete_education(&self, education_id: EducationId) -> Result<()> {
        let url = endpoint(
            &self.api_base,
            "api/v1/education/",
            Some(&education_id.0.to_string()),
        )?;
        debug!(%url, "gateway: DELETE");
        let response = self.http.delete(url).send().await?;
        expect_success(response).await
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
