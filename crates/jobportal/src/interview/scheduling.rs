use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use uuid::Uuid;

use super::domain::{Interview, InterviewId, InterviewStatus};
use super::repository::InterviewRepository;
use crate::applications::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus, RepositoryError,
};
use crate::auth::AuthSession;

/// Durations offered for a booking, in minutes.
pub const INTERVIEW_DURATION_OPTIONS_MIN: [u16; 4] = [15, 30, 45, 60];

/// Bookable dates: the next 14 calendar days, weekends skipped.
pub fn interview_date_options(today: NaiveDate) -> Vec<NaiveDate> {
    (1..=14)
        .map(|offset| today + Duration::days(offset))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Bookable times: 09:00 through 16:30 in 30-minute increments.
pub fn interview_time_slots() -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    for hour in 9..17 {
        for minute in [0, 30] {
            slots.push(NaiveTime::from_hms_opt(hour, minute, 0).expect("valid slot time"));
        }
    }
    slots
}

/// A candidate's booking selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub application_id: ApplicationId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u16,
}

/// Service inserting interview records against interview-ready applications.
pub struct ScheduleService {
    applications: Arc<dyn ApplicationRepository>,
    interviews: Arc<dyn InterviewRepository>,
}

impl ScheduleService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        interviews: Arc<dyn InterviewRepository>,
    ) -> Self {
        Self {
            applications,
            interviews,
        }
    }

    /// Applications of the signed-in user that are ready for an interview.
    pub async fn interview_ready(
        &self,
        session: &AuthSession,
    ) -> Result<Vec<Application>, ScheduleError> {
        let ready = self
            .applications
            .with_status(&session.user_id, ApplicationStatus::Interview)
            .await?;
        Ok(ready)
    }

    /// Books an interview. Selections outside the generated options are
    /// rejected; overlapping bookings are not checked for.
    pub async fn schedule(
        &self,
        session: &AuthSession,
        request: ScheduleRequest,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Interview, ScheduleError> {
        let application = self
            .applications
            .fetch(&request.application_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if application.user_id != session.user_id
            || application.status != ApplicationStatus::Interview
        {
            return Err(ScheduleError::NotEligible);
        }

        if !interview_date_options(today).contains(&request.date) {
            return Err(ScheduleError::InvalidSelection("date"));
        }
        if !interview_time_slots().contains(&request.time) {
            return Err(ScheduleError::InvalidSelection("time"));
        }
        if !INTERVIEW_DURATION_OPTIONS_MIN.contains(&request.duration_minutes) {
            return Err(ScheduleError::InvalidSelection("duration"));
        }

        let scheduled_date = Utc.from_utc_datetime(&request.date.and_time(request.time));
        let interview = Interview {
            id: InterviewId(Uuid::new_v4().to_string()),
            application_id: request.application_id,
            scheduled_date,
            duration: request.duration_minutes,
            status: InterviewStatus::Scheduled,
            feedback_score: None,
            feedback_report: None,
            created_at: now,
        };

        let stored = self.interviews.insert(interview).await?;
        Ok(stored)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("application is not ready for an interview")]
    NotEligible,
    #[error("selected {0} is outside the offered booking options")]
    InvalidSelection(&'static str),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_options_cover_two_weeks_of_weekdays() {
        // 2026-08-07 is a Friday; the window holds the next two working weeks.
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date");
        let options = interview_date_options(today);

        assert_eq!(options.len(), 10);
        assert!(options
            .iter()
            .all(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert_eq!(options[0], NaiveDate::from_ymd_opt(2026, 8, 10).expect("valid date"));
        assert!(options
            .iter()
            .all(|date| *date > today && *date <= today + Duration::days(14)));
    }

    #[test]
    fn time_slots_run_every_half_hour_across_business_hours() {
        let slots = interview_time_slots();
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0], NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"));
        assert_eq!(
            *slots.last().expect("non-empty"),
            NaiveTime::from_hms_opt(16, 30, 0).expect("valid time")
        );
    }
}
