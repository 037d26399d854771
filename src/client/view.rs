use crate::models::Profile;
use std::fmt::Write;

pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", profile.name);
    let _ = writeln!(out, "{}", profile.bio);
    let _ = writeln!(out, "Picture: {}", profile.profile_picture);

    for (label, link) in [
        ("LinkedIn", &profile.social_links.linkedin),
        ("GitHub", &profile.social_links.github),
        ("Twitter", &profile.social_links.twitter),
    ] {
        if !link.is_empty() {
            let _ = writeln!(out, "{}: {}", label, link);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Skills");
    if profile.skills.is_empty() {
        let _ = writeln!(out, "  No skills added yet");
    }
    for skill in &profile.skills {
        let noun = if skill.endorsements == 1 { "endorsement" } else { "endorsements" };
        let _ = writeln!(out, "  {} ({} {}) [{}]", skill.name, skill.endorsements, noun, skill.id);
    }
    out
}
