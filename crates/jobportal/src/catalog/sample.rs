use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::domain::{Job, JobId, JobType};

/// Fixed catalog served when the hosted backend is absent or unreachable.
pub fn sample_jobs() -> Vec<Job> {
    vec![
        Job {
            id: JobId("1".to_string()),
            title: "Senior Frontend Developer".to_string(),
            company: "TechCorp Inc.".to_string(),
            location: "San Francisco, CA".to_string(),
            job_type: JobType::FullTime,
            salary_range: "$120,000 - $160,000".to_string(),
            description: "We are looking for a Senior Frontend Developer to join our dynamic team. \
                          You will be responsible for developing user-facing web applications using \
                          modern JavaScript frameworks."
                .to_string(),
            requirements: vec![
                "5+ years of React experience".to_string(),
                "Strong TypeScript skills".to_string(),
                "Experience with modern build tools".to_string(),
                "Knowledge of responsive design".to_string(),
            ],
            benefits: vec![
                "Health insurance".to_string(),
                "Flexible working hours".to_string(),
                "Remote work options".to_string(),
                "401k matching".to_string(),
            ],
            posted_date: date(2024, 1, 15),
            application_deadline: date(2024, 2, 15),
            created_at: timestamp(2024, 1, 15, 10),
        },
        Job {
            id: JobId("2".to_string()),
            title: "Product Manager".to_string(),
            company: "StartupXYZ".to_string(),
            location: "New York, NY".to_string(),
            job_type: JobType::FullTime,
            salary_range: "$100,000 - $140,000".to_string(),
            description: "Join our product team to drive the development of innovative solutions. \
                          You will work closely with engineering and design teams to deliver \
                          exceptional user experiences."
                .to_string(),
            requirements: vec![
                "3+ years product management experience".to_string(),
                "Strong analytical skills".to_string(),
                "Experience with Agile methodologies".to_string(),
                "Excellent communication skills".to_string(),
            ],
            benefits: vec![
                "Equity package".to_string(),
                "Unlimited PTO".to_string(),
                "Learning budget".to_string(),
                "Team retreats".to_string(),
            ],
            posted_date: date(2024, 1, 10),
            application_deadline: date(2024, 2, 10),
            created_at: timestamp(2024, 1, 10, 9),
        },
        Job {
            id: JobId("3".to_string()),
            title: "UX Designer".to_string(),
            company: "Design Studio".to_string(),
            location: "Remote".to_string(),
            job_type: JobType::Contract,
            salary_range: "$80 - $120/hour".to_string(),
            description: "We need a talented UX Designer to help create intuitive and engaging user \
                          experiences for our clients. You will be involved in the entire design \
                          process from research to prototyping."
                .to_string(),
            requirements: vec![
                "Portfolio showcasing UX work".to_string(),
                "Proficiency in Figma/Sketch".to_string(),
                "User research experience".to_string(),
                "Understanding of accessibility principles".to_string(),
            ],
            benefits: vec![
                "Flexible schedule".to_string(),
                "Remote work".to_string(),
                "Professional development".to_string(),
                "Creative freedom".to_string(),
            ],
            posted_date: date(2024, 1, 12),
            application_deadline: date(2024, 2, 12),
            created_at: timestamp(2024, 1, 12, 14),
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid sample date")
}

fn timestamp(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid sample timestamp")
}
