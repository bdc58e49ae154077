//! Outer modal shell and the three-way workflow mode layered on top of it.
//!
//! All transitions go through [`ModalShell::transition`]. Closing any section
//! editor always collapses the shell and returns the workflow mode to idle.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    #[default]
    Idle,
    ProfileUpdate,
    BuildPortfolio,
    ViewTemplates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalEvent {
    ProfileUpdate,
    BuildPortfolio,
    ViewTemplates,
    /// Opens the shell without touching the workflow mode (generic editor).
    OpenShell,
    /// Closes the shell without touching the workflow mode (after a toggle).
    CollapseShell,
    /// Any section editor dismissed through the full close path.
    CloseEditor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModalShell {
    pub shell: ShellState,
    pub mode: WorkflowMode,
}

impl ModalShell {
    pub fn transition(
        _shell: ShellState,
        mode: WorkflowMode,
        event: ModalEvent,
    ) -> (ShellState, WorkflowMode) {
        match event {
            ModalEvent::ProfileUpdate => (ShellState::Open, WorkflowMode::ProfileUpdate),
            ModalEvent::BuildPortfolio => (ShellState::Open, WorkflowMode::BuildPortfolio),
            ModalEvent::ViewTemplates => (ShellState::Open, WorkflowMode::ViewTemplates),
            ModalEvent::OpenShell => (ShellState::Open, mode),
            ModalEvent::CollapseShell => (ShellState::Closed, mode),
            ModalEvent::CloseEditor => (ShellState::Closed, WorkflowMode::Idle),
        }
    }

    /// Applies `event` and reports whether anything changed.
    pub fn apply(&mut self, event: ModalEvent) -> bool {
        let (shell, mode) = Self::transition(self.shell, self.mode, event);
        let changed = shell != self.shell || mode != self.mode;
        self.shell = shell;
        self.mode = mode;
        changed
    }

    pub fn is_open(&self) -> bool {
        self.shell == ShellState::Open
    }

    pub fn show_profile_update(&self) -> bool {
        self.mode == WorkflowMode::ProfileUpdate
    }

    pub fn show_build_portfolio(&self) -> bool {
        self.mode == WorkflowMode::BuildPortfolio
    }

    pub fn show_view_templates(&self) -> bool {
        self.mode == WorkflowMode::ViewTemplates
    }
}
