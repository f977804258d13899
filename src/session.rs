//! Session controller.
//!
//! A session moves through `AwaitingLicense → Editing → {Saved, Aborted}`.
//! It owns a stack of layers: the Editing Screen at the bottom, at most one
//! dialog above it. Inputs go to the top layer only. When a dialog is done it
//! is popped and its result is posted to the layer below as a [`DialogResult`].
//!
//! ```
//! use git_pal::license::{License, LicenseError, LicenseGate};
//! use git_pal::session::{Input, Session, SessionResult};
//! use git_pal::todo::{parse, serialize};
//!
//! struct Granted;
//! impl LicenseGate for Granted {
//!     fn verify(&self) -> Result<License, LicenseError> {
//!         Ok(License {
//!             subject: "me@example.com".into(),
//!             issuer: "git-pal-licensing".into(),
//!             expires_at: chrono::Utc::now(),
//!             features: Default::default(),
//!             purchase_id: None,
//!         })
//!     }
//! }
//!
//! let parsed = parse("pick a1b2c3d commit 1\n# note\nreword e4f5a6b commit 2\n");
//! let mut session = Session::start(parsed.actions, &Granted);
//! session.handle(Input::SelectRow(1));
//! session.handle(Input::Submit("squash".into()));
//! session.handle(Input::Save);
//!
//! let Some(SessionResult::Saved(list)) = session.into_result() else { panic!() };
//! assert_eq!(serialize(&list), "pick a1b2c3d commit 1\nsquash e4f5a6b commit 2\n# note\n");
//! ```

use crate::action::Action;
use crate::dialog::{ConfirmDialog, EditDialog, EditResult, FailureDialog};
use crate::license::{Features, License, LicenseGate};
use crate::screen::{DialogResult, EditingScreen, ScreenRequest};
use crate::suggest::{Autosquash, Suggester, Suggestion};

/// One discrete user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Move the row cursor up (wraps).
    Up,
    /// Move the row cursor down (wraps).
    Down,
    /// Edit the row under the cursor.
    Select,
    /// Edit the row at this index.
    SelectRow(usize),
    Save,
    Quit,
    /// Confirm the Edit Dialog with this command text.
    Submit(String),
    Cancel,
    /// Answer to a yes/no question.
    Answer(bool),
    /// Acknowledge a notice.
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingLicense,
    Editing,
    Saved,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Saved | SessionState::Aborted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    UserQuit,
    License(String),
}

/// Terminal value of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    Saved(Vec<Action>),
    Aborted(AbortReason),
}

/// An entry of the screen stack.
pub enum Layer {
    Editor(EditingScreen),
    EditAction(EditDialog),
    ConfirmAbort(ConfirmDialog),
    LicenseFailure(FailureDialog),
}

/// What the top layer decided, computed before the stack is touched.
enum Step {
    Stay,
    Push(Layer),
    Pop(Option<DialogResult>),
    Finish(SessionResult),
}

pub struct Session {
    original: Vec<Action>,
    features: Features,
    license: Option<License>,
    state: SessionState,
    stack: Vec<Layer>,
    result: Option<SessionResult>,
    suggestions: Vec<Suggestion>,
}

impl Session {
    /// Starts a session with the default [`Autosquash`] suggester.
    pub fn start(actions: Vec<Action>, gate: &dyn LicenseGate) -> Session {
        Session::start_with(actions, gate, Box::new(Autosquash))
    }

    /// Starts a session and consults `gate` exactly once.
    ///
    /// On success the session is `Editing` with the Editing Screen on top.
    /// On failure it is already `Aborted`; a failure notice stays on the stack
    /// until dismissed.
    pub fn start_with(
        actions: Vec<Action>,
        gate: &dyn LicenseGate,
        suggester: Box<dyn Suggester>,
    ) -> Session {
        let mut session = Session {
            original: actions,
            features: Features::default(),
            license: None,
            state: SessionState::AwaitingLicense,
            stack: Vec::new(),
            result: None,
            suggestions: Vec::new(),
        };

        match gate.verify() {
            Ok(license) => {
                session.features = license.features.clone();
                session.license = Some(license);
                let screen =
                    EditingScreen::open(&session.original, session.features.clone(), suggester);
                session.stack.push(Layer::Editor(screen));
                session.state = SessionState::Editing;
                tracing::info!(actions = session.original.len(), "session editing");
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(reason = %reason, "license verification failed");
                session.finish(SessionResult::Aborted(AbortReason::License(reason.clone())));
                session
                    .stack
                    .push(Layer::LicenseFailure(FailureDialog::license(reason)));
            }
        }

        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The actions parsed at load time. Never modified by editing.
    pub fn original(&self) -> &[Action] {
        &self.original
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn license(&self) -> Option<&License> {
        self.license.as_ref()
    }

    /// The layer that receives the next input.
    pub fn top(&self) -> Option<&Layer> {
        self.stack.last()
    }

    /// The session is over once it reached a terminal state and nothing is
    /// left on screen.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal() && self.stack.is_empty()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<SessionResult> {
        self.result
    }

    /// Suggestions the Editing Screen produced on save.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Feeds one input to the top layer.
    pub fn handle(&mut self, input: Input) {
        let step = match self.stack.last_mut() {
            None => return,
            Some(Layer::Editor(screen)) => match screen.handle(input) {
                ScreenRequest::Stay => Step::Stay,
                ScreenRequest::OpenEdit(action) => {
                    Step::Push(Layer::EditAction(EditDialog::new(action)))
                }
                ScreenRequest::ConfirmQuit => {
                    Step::Push(Layer::ConfirmAbort(ConfirmDialog::abort_rebase()))
                }
                ScreenRequest::Save(list) => {
                    self.suggestions = screen.suggestions().to_vec();
                    Step::Finish(SessionResult::Saved(list))
                }
                ScreenRequest::Abort => Step::Finish(SessionResult::Aborted(AbortReason::UserQuit)),
            },
            Some(Layer::EditAction(dialog)) => match dialog.handle(input) {
                Some(result) => Step::Pop(Some(DialogResult::Edit(result))),
                None => Step::Stay,
            },
            Some(Layer::ConfirmAbort(dialog)) => match dialog.handle(input) {
                Some(answer) => Step::Pop(Some(DialogResult::Confirm(answer))),
                None => Step::Stay,
            },
            Some(Layer::LicenseFailure(dialog)) => {
                if dialog.handle(input) {
                    Step::Pop(None)
                } else {
                    Step::Stay
                }
            }
        };

        self.apply(step);
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::Stay => {}
            Step::Push(layer) => self.stack.push(layer),
            Step::Pop(result) => {
                self.stack.pop();
                if let Some(result) = result {
                    self.post(result);
                }
            }
            Step::Finish(result) => {
                self.stack.clear();
                self.finish(result);
            }
        }
    }

    /// Delivers a dialog result to the layer now on top.
    fn post(&mut self, result: DialogResult) {
        if let DialogResult::Edit(EditResult::Edited(action)) = &result {
            tracing::debug!(line = %action, "edit confirmed");
        }
        let step = match self.stack.last_mut() {
            Some(Layer::Editor(screen)) => match screen.on_result(result) {
                ScreenRequest::Abort => Step::Finish(SessionResult::Aborted(AbortReason::UserQuit)),
                _ => Step::Stay,
            },
            _ => Step::Stay,
        };
        self.apply(step);
    }

    fn finish(&mut self, result: SessionResult) {
        if self.result.is_some() {
            return;
        }
        self.state = match result {
            SessionResult::Saved(_) => SessionState::Saved,
            SessionResult::Aborted(_) => SessionState::Aborted,
        };
        tracing::info!(state = ?self.state, "session finished");
        self.result = Some(result);
    }
}
