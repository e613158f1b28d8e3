//! Record → protobuf conversion.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use portfolio_store::{Company, Education, Experience, Institution, Skill};

use crate::proto;

pub fn timestamp(at: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: at.timestamp(),
        nanos: at.timestamp_subsec_nanos() as i32,
    }
}

pub fn date(on: NaiveDate) -> proto::Date {
    proto::Date {
        year: on.year(),
        month: on.month() as i32,
        day: on.day() as i32,
    }
}

impl From<Skill> for proto::Skill {
    fn from(skill: Skill) -> Self {
        proto::Skill {
            id: skill.id,
            title: skill.title,
            level: skill.level,
            created_at: skill.created_at.map(timestamp),
            updated_at: skill.updated_at.map(timestamp),
        }
    }
}

impl From<Company> for proto::experience::Company {
    fn from(company: Company) -> Self {
        proto::experience::Company {
            name: company.name,
            url: company.url,
            logo_url: company.logo_url,
        }
    }
}

impl From<Experience> for proto::Experience {
    fn from(exp: Experience) -> Self {
        proto::Experience {
            id: exp.id,
            title: exp.title,
            description: exp.description,
            company: exp.company.map(Into::into),
            technologies: exp.languages,
            started_at: exp.started_on.map(date),
            ended_at: exp.ended_on.map(date),
            created_at: exp.created_at.map(timestamp),
            updated_at: exp.updated_at.map(timestamp),
            frameworks: exp.frameworks,
        }
    }
}

impl From<Institution> for proto::education::Institution {
    fn from(institution: Institution) -> Self {
        proto::education::Institution {
            name: institution.name,
            url: institution.url,
        }
    }
}

impl From<Education> for proto::Education {
    fn from(edu: Education) -> Self {
        proto::Education {
            id: edu.id,
            title: edu.title,
            institution: edu.institution.map(Into::into),
            started_at: edu.started_on.map(date),
            ended_at: edu.ended_on.map(date),
            created_at: edu.created_at.map(timestamp),
            updated_at: edu.updated_at.map(timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_keeps_subsecond_precision() {
        let at = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let ts = timestamp(at);
        assert_eq!(ts.seconds, at.timestamp());
        assert_eq!(ts.nanos, 250_000_000);
    }

    #[test]
    fn experience_technologies_are_languages() {
        let exp = Experience {
            id: 4,
            title: "Backend Engineer".into(),
            description: "APIs".into(),
            company: Some(Company {
                name: "Acme".into(),
                url: None,
                logo_url: Some("https://acme.test/logo.png".into()),
            }),
            languages: vec!["Rust".into(), "Go".into()],
            frameworks: vec!["axum".into()],
            started_on: NaiveDate::from_ymd_opt(2020, 1, 6),
            ended_on: None,
            created_at: None,
            updated_at: None,
        };

        let pb = proto::Experience::from(exp);
        assert_eq!(pb.technologies, vec!["Rust".to_string(), "Go".to_string()]);
        assert_eq!(pb.frameworks, vec!["axum".to_string()]);
        assert_eq!(
            pb.started_at,
            Some(proto::Date {
                year: 2020,
                month: 1,
                day: 6
            })
        );
        assert!(pb.ended_at.is_none());
        let company = pb.company.unwrap();
        assert!(company.url.is_none());
        assert_eq!(company.logo_url.as_deref(), Some("https://acme.test/logo.png"));
    }

    #[test]
    fn missing_columns_stay_unset() {
        let pb = proto::Education::from(Education {
            id: 1,
            title: "MSc".into(),
            institution: None,
            started_on: None,
            ended_on: None,
            created_at: None,
            updated_at: None,
        });
        assert!(pb.institution.is_none());
        assert!(pb.started_at.is_none());
        assert!(pb.created_at.is_none());
    }
}
