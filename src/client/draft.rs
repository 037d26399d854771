use crate::models::{Profile, SkillInput, SocialLinks, SocialLinksInput, UpsertProfilePayload};

/// Local edit copy of the profile backing the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub bio: String,
    pub profile_picture: String,
    pub social_links: SocialLinks,
    pub skills: Vec<SkillInput>,
}

impl ProfileDraft {
    /// Seeds the draft from the current profile. Skill ids and counts are echoed back on submit.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            profile_picture: profile.profile_picture.clone(),
            social_links: profile.social_links.clone(),
            skills: profile
                .skills
                .iter()
                .map(|skill| SkillInput {
                    id: Some(skill.id.clone()),
                    name: skill.name.clone(),
                    endorsements: Some(skill.endorsements),
                })
                .collect(),
        }
    }

    /// Appends a new skill; blank names are ignored.
    pub fn add_skill(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.skills.push(SkillInput {
            id: None,
            name: name.to_string(),
            endorsements: Some(0),
        });
        true
    }

    pub fn remove_skill(&mut self, index: usize) -> Option<SkillInput> {
        (index < self.skills.len()).then(|| self.skills.remove(index))
    }

    pub fn to_payload(&self) -> UpsertProfilePayload {
        UpsertProfilePayload {
            name: Some(self.name.clone()),
            bio: Some(self.bio.clone()),
            profile_picture: Some(self.profile_picture.clone()),
            social_links: Some(SocialLinksInput::from(&self.social_links)),
            skills: Some(self.skills.clone()),
        }
    }
}
