//! Typed command surface routed onto the session facade.

use std::str::FromStr;

use shared::domain::UserId;
use tracing::debug;

use crate::{
    error::{PortfolioError, Result},
    gateway::CoverUpload,
    session::PortfolioSession,
};

#[derive(Debug, Clone)]
pub enum PortfolioCommand {
    ToggleSection { title: String },
    EditSection { id: String },
    CloseSection { id: Option<String> },
    DetachEditor { id: String },
    ProfileUpdate,
    BuildPortfolio,
    ViewTemplates,
    OpenShell,
    StartSession { target: Option<UserId> },
    FetchProfile { user_id: UserId },
    UploadCover { input_id: String, upload: CoverUpload },
    SetOpenDelete(bool),
}

impl PortfolioCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleSection { .. } => "toggle_section",
            Self::EditSection { .. } => "edit_section",
            Self::CloseSection { .. } => "close_section",
            Self::DetachEditor { .. } => "detach_editor",
            Self::ProfileUpdate => "profile_update",
            Self::BuildPortfolio => "build_portfolio",
            Self::ViewTemplates => "view_templates",
            Self::OpenShell => "open_shell",
            Self::StartSession { .. } => "start_session",
            Self::FetchProfile { .. } => "fetch_profile",
            Self::UploadCover { .. } => "upload_cover",
            Self::SetOpenDelete(_) => "set_open_delete",
        }
    }
}

/// Script syntax: `toggle:<title>`, `edit:<id>`, `close`, `close:<id>`,
/// `detach:<id>`, `profile-update`, `build-portfolio`, `view-templates`,
/// `open-shell`, `fetch:<user>`, `open-delete`, `close-delete`.
impl FromStr for PortfolioCommand {
    type Err = PortfolioError;

    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (verb, arg) = match raw.split_once(':') {
            Some((verb, arg)) => (verb.trim(), Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (raw, None),
        };
        let required = |arg: Option<&str>| {
            arg.map(str::to_string)
                .ok_or_else(|| PortfolioError::Validation(format!("command '{raw}' needs an argument")))
        };

        let command = match verb {
            "toggle" => Self::ToggleSection {
                title: required(arg)?,
            },
            "edit" => Self::EditSection { id: required(arg)? },
            "close" => Self::CloseSection {
                id: arg.map(str::to_string),
            },
            "detach" => Self::DetachEditor { id: required(arg)? },
            "profile-update" => Self::ProfileUpdate,
            "build-portfolio" => Self::BuildPortfolio,
            "view-templates" => Self::ViewTemplates,
            "open-shell" => Self::OpenShell,
            "fetch" => Self::FetchProfile {
                user_id: UserId::new(required(arg)?),
            },
            "open-delete" => Self::SetOpenDelete(true),
            "close-delete" => Self::SetOpenDelete(false),
            _ => {
                return Err(PortfolioError::Validation(format!(
                    "unrecognized command '{raw}'"
                )))
            }
        };
        Ok(command)
    }
}

pub async fn dispatch(session: &PortfolioSession, command: PortfolioCommand) -> Result<()> {
    let name = command.name();
    debug!(command = name, "dispatching portfolio command");

    let result = match command {
        PortfolioCommand::ToggleSection { title } => {
            session.toggle_section(&title).await.map(|_| ())
        }
        PortfolioCommand::EditSection { id } => session.edit_section(&id).await,
        PortfolioCommand::CloseSection { id } => session.close_section(id.as_deref()).await,
        PortfolioCommand::DetachEditor { id } => session.detach_editor(&id).await,
        PortfolioCommand::ProfileUpdate => session.profile_update().await,
        PortfolioCommand::BuildPortfolio => session.build_portfolio().await,
        PortfolioCommand::ViewTemplates => session.view_templates().await,
        PortfolioCommand::OpenShell => session.open_shell().await,
        PortfolioCommand::StartSession { target } => session.start_session(target).await,
        PortfolioCommand::FetchProfile { user_id } => session.fetch_profile(&user_id).await,
        PortfolioCommand::UploadCover { input_id, upload } => {
            session.handle_upload_cover(&input_id, upload).await
        }
        PortfolioCommand::SetOpenDelete(open) => session.set_open_delete(open).await,
    };

    if let Err(err) = &result {
        debug!(command = name, error = %err, "portfolio command failed");
    }
    result
}
