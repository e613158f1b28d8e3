//! Canonical portfolio records.
//!
//! These are read-only projections of rows owned by an external system.
//! Optional columns stay `None` when NULL; no sentinel values are used.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// The kinds of record the catalog serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Skill,
    Experience,
    Education,
}

impl Entity {
    /// Singular lowercase name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Entity::Skill => "skill",
            Entity::Experience => "experience",
            Entity::Education => "education",
        }
    }

    /// Metric subject for repository operations on this entity.
    pub fn subject(self) -> &'static str {
        match self {
            Entity::Skill => "skills",
            Entity::Experience => "experiences",
            Entity::Education => "educations",
        }
    }

    /// Operation name reported for `list()`.
    pub fn list_operation(self) -> &'static str {
        match self {
            Entity::Skill => "ListSkills",
            Entity::Experience => "ListExperiences",
            Entity::Education => "ListEducations",
        }
    }

    /// Operation name reported for `get(id)`.
    pub fn get_operation(self) -> &'static str {
        match self {
            Entity::Skill => "GetSkill",
            Entity::Experience => "GetExperience",
            Entity::Education => "GetEducation",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour shared by every record kind.
pub trait Record: Clone + Send + Sync + 'static {
    const ENTITY: Entity;

    fn id(&self) -> i64;

    /// Start date used for list ordering. Records without one sort first.
    fn started_on(&self) -> Option<NaiveDate> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: i64,
    pub title: String,
    pub level: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Skill {
    const ENTITY: Entity = Entity::Skill;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Employer attached to an experience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    pub url: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub company: Option<Company>,
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Experience {
    const ENTITY: Entity = Entity::Experience;

    fn id(&self) -> i64 {
        self.id
    }

    fn started_on(&self) -> Option<NaiveDate> {
        self.started_on
    }
}

/// School or organisation attached to an education entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Education {
    pub id: i64,
    pub title: String,
    pub institution: Option<Institution>,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Education {
    const ENTITY: Entity = Entity::Education;

    fn id(&self) -> i64 {
        self.id
    }

    fn started_on(&self) -> Option<NaiveDate> {
        self.started_on
    }
}
