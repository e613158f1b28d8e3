//! JSON renderings of the RPC replies.
//!
//! Follows the protobuf JSON mapping: lowerCamelCase keys, `int64` as a
//! decimal string, `Timestamp` as RFC 3339 in UTC, unset messages omitted.

use chrono::{DateTime, SecondsFormat};
use portfolio_rpc::proto;
use serde::Serialize;

/// RFC 3339 rendering of a protobuf timestamp. Out-of-range values are
/// omitted rather than rendered wrong.
pub fn rfc3339(ts: &prost_types::Timestamp) -> Option<String> {
    let nanos = u32::try_from(ts.nanos).ok()?;
    DateTime::from_timestamp(ts.seconds, nanos)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[derive(Debug, Serialize)]
pub struct DateJson {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl From<proto::Date> for DateJson {
    fn from(d: proto::Date) -> Self {
        DateJson {
            year: d.year,
            month: d.month,
            day: d.day,
        }
    }
}

// ── Skills ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillJson {
    pub id: String,
    pub title: String,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<proto::Skill> for SkillJson {
    fn from(s: proto::Skill) -> Self {
        SkillJson {
            id: s.id.to_string(),
            title: s.title,
            level: s.level,
            created_at: s.created_at.as_ref().and_then(rfc3339),
            updated_at: s.updated_at.as_ref().and_then(rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillsJson {
    pub skills: Vec<SkillJson>,
}

#[derive(Debug, Serialize)]
pub struct SkillReplyJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillJson>,
}

// ── Experiences ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceJson {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyJson>,
    pub technologies: Vec<String>,
    pub frameworks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<proto::Experience> for ExperienceJson {
    fn from(e: proto::Experience) -> Self {
        ExperienceJson {
            id: e.id.to_string(),
            title: e.title,
            description: e.description,
            company: e.company.map(|c| CompanyJson {
                name: c.name,
                url: c.url,
                logo_url: c.logo_url,
            }),
            technologies: e.technologies,
            frameworks: e.frameworks,
            started_at: e.started_at.map(Into::into),
            ended_at: e.ended_at.map(Into::into),
            created_at: e.created_at.as_ref().and_then(rfc3339),
            updated_at: e.updated_at.as_ref().and_then(rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExperiencesJson {
    pub experiences: Vec<ExperienceJson>,
}

#[derive(Debug, Serialize)]
pub struct ExperienceReplyJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceJson>,
}

// ── Educations ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InstitutionJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<InstitutionJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<proto::Education> for EducationJson {
    fn from(e: proto::Education) -> Self {
        EducationJson {
            id: e.id.to_string(),
            title: e.title,
            institution: e.institution.map(|i| InstitutionJson {
                name: i.name,
                url: i.url,
            }),
            started_at: e.started_at.map(Into::into),
            ended_at: e.ended_at.map(Into::into),
            created_at: e.created_at.as_ref().and_then(rfc3339),
            updated_at: e.updated_at.as_ref().and_then(rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EducationsJson {
    pub educations: Vec<EducationJson>,
}

#[derive(Debug, Serialize)]
pub struct EducationReplyJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<EducationJson>,
}
