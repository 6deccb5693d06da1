//! Edit flow for a single record.
//!
//! `Idle -> Editing -> Submitting -> Idle` on success, or back to `Editing`
//! with the typed values retained on failure.

use serde_json::Value;

use super::{ClientError, ProfileClient};
use crate::domain::profiles::{Profile, ProfileFields, ProfileId, ProfileRequest, ValidationError};

/// Raw form inputs, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            gender: profile.gender.clone(),
            age: profile.age.to_string(),
        }
    }

    /// Same rules the server applies, checked before anything is sent.
    pub fn validate(&self) -> Result<ProfileFields, ValidationError> {
        ProfileRequest {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            gender: Some(self.gender.clone()),
            age: Some(Value::String(self.age.clone())),
        }
        .validate()
    }
}

/// What a submit will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(ProfileId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing { target: EditTarget, form: ProfileForm },
    Submitting { target: EditTarget, form: ProfileForm },
}

/// Validated request produced by [`EditSession::start_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub target: EditTarget,
    pub fields: ProfileFields,
}

#[derive(Debug)]
pub struct EditSession {
    state: EditState,
    last_error: Option<String>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            state: EditState::Idle,
            last_error: None,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Message of the most recent failed submit, cleared on the next begin
    /// or successful submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_create(&mut self) -> Result<(), ClientError> {
        self.begin(EditTarget::New, ProfileForm::default())
    }

    pub fn begin_edit(&mut self, profile: &Profile) -> Result<(), ClientError> {
        self.begin(
            EditTarget::Existing(profile.id),
            ProfileForm::from_profile(profile),
        )
    }

    fn begin(&mut self, target: EditTarget, form: ProfileForm) -> Result<(), ClientError> {
        if matches!(self.state, EditState::Submitting { .. }) {
            return Err(ClientError::Busy);
        }
        self.state = EditState::Editing { target, form };
        self.last_error = None;
        Ok(())
    }

    /// Mutable access to the inputs; only while editing.
    pub fn form_mut(&mut self) -> Option<&mut ProfileForm> {
        match &mut self.state {
            EditState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Result<(), ClientError> {
        match self.state {
            EditState::Submitting { .. } => Err(ClientError::Busy),
            _ => {
                self.state = EditState::Idle;
                self.last_error = None;
                Ok(())
            }
        }
    }

    /// Validate the form and move to `Submitting`.
    ///
    /// A form that fails validation stays in `Editing`, untouched.
    pub fn start_submit(&mut self) -> Result<PendingSubmit, ClientError> {
        let (target, form) = match &self.state {
            EditState::Editing { target, form } => (*target, form),
            EditState::Submitting { .. } => return Err(ClientError::Busy),
            EditState::Idle => return Err(ClientError::InvalidState("nothing is being edited")),
        };

        let fields = match form.validate() {
            Ok(fields) => fields,
            Err(e) => {
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let form = form.clone();
        self.state = EditState::Submitting { target, form };
        Ok(PendingSubmit { target, fields })
    }

    /// Leave `Submitting`: `Idle` on success, `Editing` with the same inputs
    /// on failure.
    pub fn finish_submit(&mut self, outcome: Result<(), &ClientError>) {
        let EditState::Submitting { target, form } =
            std::mem::replace(&mut self.state, EditState::Idle)
        else {
            return;
        };

        match outcome {
            Ok(()) => self.last_error = None,
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.state = EditState::Editing { target, form };
            }
        }
    }

    /// Run a full submit against the client.
    pub async fn submit(&mut self, client: &ProfileClient) -> Result<Profile, ClientError> {
        let pending = self.start_submit()?;

        let result = match pending.target {
            EditTarget::New => client.submit_create(pending.fields).await,
            EditTarget::Existing(id) => client.submit_update(id, pending.fields).await,
        };

        self.finish_submit(result.as_ref().map(|_| ()));
        result
    }
}
