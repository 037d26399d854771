use crate::client::draft::ProfileDraft;
use crate::client::{user_message, ProfileApi};
use crate::models::Profile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    Error { message: String, has_profile: bool },
    Editing,
    Saving,
}

/// Client-side state for the profile page: loading, edit mode, saving and optimistic endorsements.
pub struct ProfileController<A: ProfileApi> {
    api: A,
    state: ViewState,
    profile: Option<Profile>,
    draft: Option<ProfileDraft>,
    error: Option<String>,
}

impl<A: ProfileApi> ProfileController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ViewState::Loading,
            profile: None,
            draft: None,
            error: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ProfileDraft> {
        self.draft.as_mut()
    }

    /// Last user-visible error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn load(&mut self) -> bool {
        self.state = ViewState::Loading;
        self.error = None;
        self.refresh("Failed to load profile").await
    }

    pub fn begin_edit(&mut self) -> bool {
        let editable = matches!(
            self.state,
            ViewState::Ready | ViewState::Error { has_profile: true, .. }
        );
        let Some(profile) = self.profile.as_ref().filter(|_| editable) else {
            return false;
        };
        self.draft = Some(ProfileDraft::from_profile(profile));
        self.state = ViewState::Editing;
        true
    }

    pub fn cancel_edit(&mut self) {
        if self.state == ViewState::Editing {
            self.draft = None;
            self.state = ViewState::Ready;
        }
    }

    pub async fn submit_edit(&mut self) -> bool {
        if self.state != ViewState::Editing {
            return false;
        }
        let Some(payload) = self.draft.as_ref().map(ProfileDraft::to_payload) else {
            return false;
        };

        self.state = ViewState::Saving;
        self.error = None;
        match self.api.update_profile(payload).await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.draft = None;
                self.state = ViewState::Ready;
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "profile update failed");
                self.error = Some(user_message(&error, "Failed to update profile"));
                self.state = ViewState::Editing;
                false
            }
        }
    }

    /// Bumps the local count for `skill_id` without waiting for the server.
    pub fn apply_optimistic_endorsement(&mut self, skill_id: &str) -> bool {
        let Some(skill) = self
            .profile
            .as_mut()
            .and_then(|profile| profile.skills.iter_mut().find(|skill| skill.id == skill_id))
        else {
            return false;
        };
        skill.endorsements = skill.endorsements.saturating_add(1);
        true
    }

    /// Optimistic endorse. On failure the local state is replaced by a fresh server read.
    pub async fn endorse(&mut self, skill_id: &str) -> bool {
        let busy = matches!(self.state, ViewState::Editing | ViewState::Saving | ViewState::Loading);
        if busy || self.profile.is_none() {
            return false;
        }

        self.apply_optimistic_endorsement(skill_id);
        match self.api.endorse_skill(skill_id).await {
            Ok(result) => {
                if let Some(skill) = self
                    .profile
                    .as_mut()
                    .and_then(|profile| profile.skills.iter_mut().find(|skill| skill.id == result.skill_id))
                {
                    skill.endorsements = result.endorsements;
                }
                true
            }
            Err(error) => {
                tracing::warn!(skill_id = %skill_id, error = %error, "endorsement failed, reloading profile");
                self.refresh("Failed to load profile").await;
                let message = user_message(&error, "Failed to endorse skill");
                if let ViewState::Error { message: current, .. } = &mut self.state {
                    *current = message.clone();
                }
                self.error = Some(message);
                false
            }
        }
    }

    async fn refresh(&mut self, fallback: &str) -> bool {
        match self.api.fetch_profile().await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.state = ViewState::Ready;
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "profile fetch failed");
                let message = user_message(&error, fallback);
                self.state = ViewState::Error {
                    message: message.clone(),
                    has_profile: self.profile.is_some(),
                };
                self.error = Some(message);
                false
            }
        }
    }
}
