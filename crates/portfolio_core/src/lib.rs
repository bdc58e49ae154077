//! Section selection and modal orchestration for the portfolio builder.
//!
//! [`PortfolioSession`] is the only mutable entry point. It owns the section
//! partition, the per-section editor visibility map, the outer modal shell and
//! the remote profile state, and publishes every change on a broadcast bus.

pub mod catalog;
pub mod config;
pub mod education;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod loading;
pub mod notice;
pub mod orchestration;
pub mod partition;
pub mod session;
pub mod shell;
pub mod token_store;
pub mod visibility;

#[cfg(test)]
mod test_support;

pub use catalog::{SectionCatalog, SectionDefinition};
pub use config::{load_settings, Settings};
pub use education::{EducationEditor, EducationForm, SubmitOutcome, ValidationReport};
pub use error::{PortfolioError, Result};
pub use gateway::{CoverUpload, HttpPortfolioApi, PortfolioApi};
pub use loading::{LoadingOp, LoadingTracker};
pub use notice::{Notice, NoticeCategory, NoticeContext, Severity};
pub use orchestration::{dispatch, PortfolioCommand};
pub use partition::{PartitionStore, ToggleOutcome, CUSTOM_SECTION_SENTINEL};
pub use session::{
    CloseBehavior, ErrorState, PortfolioEvent, PortfolioSession, SectionEditorHandle,
    SessionSnapshot,
};
pub use shell::{ModalEvent, ModalShell, ShellState, WorkflowMode};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use visibility::VisibilityMap;
