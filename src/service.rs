use crate::db::ProfileStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    EndorsementResult, PendingSkill, Profile, ProfileFields, Skill, SkillInput, SocialLinks, UpsertProfilePayload,
};
use std::collections::HashSet;
use std::sync::Arc;

pub const PROFILE_NOT_FOUND: &str = "Profile not found";
pub const SKILL_NOT_FOUND: &str = "Skill not found";
pub const MISSING_REQUIRED_FIELDS: &str = "Please provide name, bio, and profile picture";

/// Builds the stored skill list for an update.
///
/// Incoming entries whose id matches an existing skill keep the stored endorsement count; any
/// other entry takes the client count or zero. Existing skills absent from `incoming` are dropped.
/// A blank id counts as no id, so the store assigns a fresh one.
pub fn merge_skills(existing: &[Skill], incoming: Vec<SkillInput>) -> Vec<PendingSkill> {
    incoming
        .into_iter()
        .map(|skill| {
            let id = skill.id.filter(|id| !id.trim().is_empty());
            let stored = id
                .as_deref()
                .and_then(|id| existing.iter().find(|current| current.id == id));
            let endorsements = match stored {
                Some(current) => current.endorsements,
                None => skill.endorsements.unwrap_or(0),
            };
            PendingSkill {
                id,
                name: skill.name.trim().to_string(),
                endorsements,
            }
        })
        .collect()
}

pub struct ProfileService<S: ProfileStore> {
    store: Arc<S>,
}

impl<S: ProfileStore> Clone for ProfileService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: ProfileStore> ProfileService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetch(&self) -> AppResult<Profile> {
        tracing::debug!("fetching profile");
        self.store
            .get()?
            .ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))
    }

    pub fn upsert(&self, payload: UpsertProfilePayload) -> AppResult<Profile> {
        let (name, bio, profile_picture) = required_fields(&payload)?;
        if let Some(skills) = &payload.skills {
            validate_skills(skills)?;
        }
        let social_links = SocialLinks::from_input(payload.social_links);

        let mut incoming = payload.skills;
        let mut created = false;
        let profile = self.store.modify(&mut |current| {
            created = current.is_none();
            let skills = match (current, incoming.take()) {
                (Some(current), Some(incoming)) => merge_skills(&current.skills, incoming),
                (Some(current), None) => current.skills.iter().map(PendingSkill::from).collect(),
                (None, incoming) => merge_skills(&[], incoming.unwrap_or_default()),
            };
            Ok(ProfileFields {
                name: name.clone(),
                bio: bio.clone(),
                profile_picture: profile_picture.clone(),
                social_links: social_links.clone(),
                skills,
            })
        })?;

        if created {
            tracing::info!(profile_id = %profile.id, skills = profile.skills.len(), "profile created");
        } else {
            tracing::info!(profile_id = %profile.id, skills = profile.skills.len(), "profile updated");
        }
        Ok(profile)
    }

    pub fn endorse(&self, skill_id: &str) -> AppResult<EndorsementResult> {
        let mut result = None;
        self.store.modify(&mut |current| {
            let profile = current.ok_or_else(|| AppError::NotFound(PROFILE_NOT_FOUND.to_string()))?;
            let mut fields = ProfileFields::from(profile);
            let target = fields
                .skills
                .iter_mut()
                .find(|skill| skill.id.as_deref() == Some(skill_id))
                .ok_or_else(|| AppError::NotFound(SKILL_NOT_FOUND.to_string()))?;
            target.endorsements = target.endorsements.saturating_add(1);
            result = Some(EndorsementResult {
                skill_id: skill_id.to_string(),
                name: target.name.clone(),
                endorsements: target.endorsements,
            });
            Ok(fields)
        })?;

        let result = result.ok_or_else(|| AppError::Internal("endorsement was not applied".to_string()))?;
        tracing::info!(skill_id = %skill_id, endorsements = result.endorsements, "skill endorsed");
        Ok(result)
    }
}

fn required_fields(payload: &UpsertProfilePayload) -> AppResult<(String, String, String)> {
    let present = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|trimmed| !trimmed.is_empty())
            .map(ToString::to_string)
    };

    match (present(&payload.name), present(&payload.bio), present(&payload.profile_picture)) {
        (Some(name), Some(bio), Some(profile_picture)) => Ok((name, bio, profile_picture)),
        _ => Err(AppError::Validation(MISSING_REQUIRED_FIELDS.to_string())),
    }
}

fn validate_skills(skills: &[SkillInput]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for skill in skills {
        if skill.name.trim().is_empty() {
            return Err(AppError::Validation("Skill name is required".to_string()));
        }
        if let Some(id) = skill.id.as_deref().filter(|id| !id.trim().is_empty()) {
            if !seen.insert(id) {
                return Err(AppError::Validation(format!("Duplicate skill id: {}", id)));
            }
        }
    }
    Ok(())
}
