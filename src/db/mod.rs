use crate::errors::{AppError, AppResult};
use crate::models::{PendingSkill, Profile, ProfileFields, Skill, SocialLinks};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Key of the only row the `profile` table may hold.
const PROFILE_SLOT: &str = "primary";

/// Persistence of the single profile document and its embedded skills.
pub trait ProfileStore: Send + Sync {
    fn get(&self) -> AppResult<Option<Profile>>;

    /// Inserts the profile, assigning its id, timestamps and any missing skill ids.
    fn create(&self, fields: ProfileFields) -> AppResult<Profile>;

    /// Overwrites the stored profile in place, keeping `id` and `created_at`.
    fn save(&self, fields: ProfileFields) -> AppResult<Profile>;

    /// Reads the current profile, lets `apply` build the replacement and writes it back as one
    /// transaction: an insert when nothing is stored, an in-place update otherwise.
    /// An error from `apply` leaves the store untouched.
    fn modify(
        &self,
        apply: &mut dyn FnMut(Option<&Profile>) -> AppResult<ProfileFields>,
    ) -> AppResult<Profile>;

    fn clear(&self) -> AppResult<()>;
}

#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl Database {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }
}

impl ProfileStore for Database {
    fn get(&self) -> AppResult<Option<Profile>> {
        let conn = self.lock()?;
        load_profile(&conn)
    }

    fn create(&self, fields: ProfileFields) -> AppResult<Profile> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        if load_profile(&tx)?.is_some() {
            return Err(AppError::Storage("a profile already exists".to_string()));
        }
        let profile = insert_profile(&tx, &fields)?;
        tx.commit()?;
        Ok(profile)
    }

    fn save(&self, fields: ProfileFields) -> AppResult<Profile> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let profile = update_profile(&tx, &fields)?;
        tx.commit()?;
        Ok(profile)
    }

    fn modify(
        &self,
        apply: &mut dyn FnMut(Option<&Profile>) -> AppResult<ProfileFields>,
    ) -> AppResult<Profile> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let current = load_profile(&tx)?;
        let fields = apply(current.as_ref())?;
        let profile = match current {
            Some(_) => update_profile(&tx, &fields)?,
            None => insert_profile(&tx, &fields)?,
        };
        tx.commit()?;
        Ok(profile)
    }

    fn clear(&self) -> AppResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM profile_skills", [])?;
        tx.execute("DELETE FROM profile", [])?;
        tx.commit()?;
        Ok(())
    }
}

fn insert_profile(conn: &Connection, fields: &ProfileFields) -> AppResult<Profile> {
    let now = Utc::now().to_rfc3339();
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO profile (
           slot, id, name, bio, profile_picture, linkedin, github, twitter, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            PROFILE_SLOT,
            id,
            fields.name,
            fields.bio,
            fields.profile_picture,
            fields.social_links.linkedin,
            fields.social_links.github,
            fields.social_links.twitter,
            now,
            now,
        ],
    )?;
    replace_skills(conn, &fields.skills)?;

    load_profile(conn)?.ok_or_else(|| AppError::Storage("profile vanished after insert".to_string()))
}

fn update_profile(conn: &Connection, fields: &ProfileFields) -> AppResult<Profile> {
    let now = Utc::now().to_rfc3339();

    let updated = conn.execute(
        "UPDATE profile
         SET name = ?1, bio = ?2, profile_picture = ?3, linkedin = ?4, github = ?5, twitter = ?6, updated_at = ?7
         WHERE slot = ?8",
        params![
            fields.name,
            fields.bio,
            fields.profile_picture,
            fields.social_links.linkedin,
            fields.social_links.github,
            fields.social_links.twitter,
            now,
            PROFILE_SLOT,
        ],
    )?;
    if updated == 0 {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }
    replace_skills(conn, &fields.skills)?;

    load_profile(conn)?.ok_or_else(|| AppError::Storage("profile vanished after update".to_string()))
}

fn load_profile(conn: &Connection) -> AppResult<Option<Profile>> {
    let row = conn
        .query_row(
            "SELECT id, name, bio, profile_picture, linkedin, github, twitter, created_at, updated_at
             FROM profile WHERE slot = ?1",
            [PROFILE_SLOT],
            |row| {
                Ok(Profile {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    bio: row.get(2)?,
                    profile_picture: row.get(3)?,
                    social_links: SocialLinks {
                        linkedin: row.get(4)?,
                        github: row.get(5)?,
                        twitter: row.get(6)?,
                    },
                    skills: Vec::new(),
                    created_at: parse_time(&row.get::<_, String>(7)?)?,
                    updated_at: parse_time(&row.get::<_, String>(8)?)?,
                })
            },
        )
        .optional()?;

    let Some(mut profile) = row else {
        return Ok(None);
    };

    let mut statement = conn.prepare(
        "SELECT id, name, endorsements FROM profile_skills WHERE slot = ?1 ORDER BY position ASC",
    )?;
    profile.skills = statement
        .query_map([PROFILE_SLOT], |row| {
            Ok(Skill {
                id: row.get(0)?,
                name: row.get(1)?,
                endorsements: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(profile))
}

fn replace_skills(conn: &Connection, skills: &[PendingSkill]) -> AppResult<()> {
    conn.execute("DELETE FROM profile_skills WHERE slot = ?1", [PROFILE_SLOT])?;

    let mut statement = conn.prepare(
        "INSERT INTO profile_skills (id, slot, position, name, endorsements) VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for (position, skill) in skills.iter().enumerate() {
        let id = skill.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        statement.execute(params![id, PROFILE_SLOT, position as i64, skill.name, skill.endorsements])?;
    }
    Ok(())
}

fn parse_time(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, error.to_string())),
            )
        })
}
