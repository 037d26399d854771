use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
}

impl SocialLinks {
    /// Full replace: every field missing from the input is cleared to an empty string.
    pub fn from_input(input: Option<SocialLinksInput>) -> Self {
        let input = input.unwrap_or_default();
        Self {
            linkedin: trimmed_or_empty(input.linkedin),
            github: trimmed_or_empty(input.github),
            twitter: trimmed_or_empty(input.twitter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinksInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl From<&SocialLinks> for SocialLinksInput {
    fn from(value: &SocialLinks) -> Self {
        Self {
            linkedin: Some(value.linkedin.clone()),
            github: Some(value.github.clone()),
            twitter: Some(value.twitter.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub endorsements: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub profile_picture: String,
    pub social_links: SocialLinks,
    pub skills: Vec<Skill>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == skill_id)
    }
}

/// One skill entry of an update payload. Ids are echoed back by clients for persisted skills.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsements: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfilePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinksInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillInput>>,
}

/// A skill ready to be persisted; the store assigns an id when `id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSkill {
    pub id: Option<String>,
    pub name: String,
    pub endorsements: u32,
}

impl From<&Skill> for PendingSkill {
    fn from(value: &Skill) -> Self {
        Self {
            id: Some(value.id.clone()),
            name: value.name.clone(),
            endorsements: value.endorsements,
        }
    }
}

/// Everything about the profile that a caller may write. Id and timestamps belong to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: String,
    pub bio: String,
    pub profile_picture: String,
    pub social_links: SocialLinks,
    pub skills: Vec<PendingSkill>,
}

impl From<&Profile> for ProfileFields {
    fn from(value: &Profile) -> Self {
        Self {
            name: value.name.clone(),
            bio: value.bio.clone(),
            profile_picture: value.profile_picture.clone(),
            social_links: value.social_links.clone(),
            skills: value.skills.iter().map(PendingSkill::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndorsementResult {
    pub skill_id: String,
    pub name: String,
    pub endorsements: u32,
}

/// Response body shared by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn ok_with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
            error: None,
        }
    }

    pub fn failure(message: &str, error: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
            error,
        }
    }
}

fn trimmed_or_empty(value: Option<String>) -> String {
    value.map(|raw| raw.trim().to_string()).unwrap_or_default()
}
