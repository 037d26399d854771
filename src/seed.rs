use crate::db::ProfileStore;
use crate::errors::AppResult;
use crate::models::{PendingSkill, Profile, ProfileFields, SocialLinks};

const SEED_SKILLS: [&str; 8] = [
    "JavaScript",
    "React",
    "Node.js",
    "MongoDB",
    "Express.js",
    "Tailwind CSS",
    "Git",
    "REST APIs",
];

pub fn sample_profile() -> ProfileFields {
    ProfileFields {
        name: "Alex Johnson".to_string(),
        bio: "Full-stack developer passionate about creating elegant solutions to complex problems. \
              I love building scalable applications and learning new technologies."
            .to_string(),
        profile_picture: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=400&fit=crop"
            .to_string(),
        social_links: SocialLinks {
            linkedin: "https://linkedin.com/in/alexjohnson".to_string(),
            github: "https://github.com/alexjohnson".to_string(),
            twitter: "https://twitter.com/alexjohnson".to_string(),
        },
        skills: SEED_SKILLS
            .iter()
            .map(|name| PendingSkill {
                id: None,
                name: name.to_string(),
                endorsements: 0,
            })
            .collect(),
    }
}

/// Wipes the store and inserts the sample profile. Maintenance only.
pub fn seed_profile<S: ProfileStore + ?Sized>(store: &S) -> AppResult<Profile> {
    store.clear()?;
    tracing::info!("existing profile deleted");
    let profile = store.create(sample_profile())?;
    tracing::info!(profile_id = %profile.id, skills = profile.skills.len(), "sample profile created");
    Ok(profile)
}
