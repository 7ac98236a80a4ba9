use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::reports::SeededRng;

const FIRST_NAMES: &[&str] = &[
    "Ava", "Ben", "Carla", "Dev", "Emeka", "Fatima", "Grace", "Hassan", "Ines", "Jonas", "Keiko", "Luca",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Brennan", "Costa", "Diallo", "Eriksen", "Fontaine", "Gupta", "Hale", "Ito", "Jensen", "Khan", "Larsen",
];

const POSITIONS: &[&str] = &[
    "Payroll Specialist", "HR Generalist", "Benefits Analyst", "Software Engineer", "Recruiter", "Accountant",
];

const SKILLS: &[&str] = &[
    "Payroll processing", "HRIS", "Excel", "Benefits administration", "Compliance", "SQL", "Rust",
    "Onboarding", "Employee relations", "Tax filing", "Reporting", "Negotiation",
];

const SCHOOLS: &[&str] = &["State University", "Tech Institute", "City College", "Northern University"];

const DEGREES: &[(&str, &str)] = &[
    ("B.S.", "Accounting"),
    ("B.A.", "Human Resources"),
    ("B.S.", "Computer Science"),
    ("M.B.A.", "Business Administration"),
    ("A.A.", "Business"),
];

const COMPANIES: &[&str] = &["Acme Corp", "Globex", "Initech", "Umbrella Health", "Stark Logistics", "Wayne Retail"];

const INTERVIEWERS: &[&str] = &["Jordan Reyes", "Morgan Lee", "Taylor Brooks", "Casey Morgan"];

const FEEDBACK: &[&str] = &[
    "Strong domain knowledge, clear communicator.",
    "Good fundamentals, needs more payroll tax exposure.",
    "Excellent culture fit.",
    "Struggled with the practical exercise.",
];

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStage {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl CandidateStage {
    const ALL: [Self; 6] = [Self::Applied, Self::Screening, Self::Interview, Self::Offer, Self::Hired, Self::Rejected];

    const fn reached_interview(self) -> bool {
        matches!(self, Self::Interview | Self::Offer | Self::Hired)
    }

    const fn reached_offer(self) -> bool {
        matches!(self, Self::Offer | Self::Hired)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Education {
    pub institution: &'static str,
    pub degree: &'static str,
    pub field: &'static str,
    pub graduation_year: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorkHistory {
    pub company: &'static str,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Candidate {
    pub id: String,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: String,
    pub position: &'static str,
    pub stage: CandidateStage,
    pub rating: f64,
    pub skills: Vec<&'static str>,
    pub education: Vec<Education>,
    pub work_history: Vec<WorkHistory>,
    pub applied_date: NaiveDate,
}

impl Candidate {
    #[must_use]
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewKind {
    Phone,
    Technical,
    Onsite,
    Panel,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, Serialize)]
pub struct Interview {
    pub id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub position: &'static str,
    pub interviewer: &'static str,
    pub kind: InterviewKind,
    pub scheduled_at: NaiveDateTime,
    pub status: InterviewStatus,
    pub rating: Option<f64>,
    pub feedback: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

#[derive(Clone, Debug, Serialize)]
pub struct Offer {
    pub id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub position: &'static str,
    pub base_salary: f64,
    pub bonus_percent: f64,
    pub start_date: NaiveDate,
    pub expires_on: NaiveDate,
    pub status: OfferStatus,
}

/// Mock applicant-tracking data derived from one seed; nothing here is persisted.
#[derive(Clone, Debug, Serialize)]
pub struct TalentPool {
    pub candidates: Vec<Candidate>,
    pub interviews: Vec<Interview>,
    pub offers: Vec<Offer>,
}

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

impl TalentPool {
    #[must_use]
    pub fn generate(seed: &str) -> Self {
        let mut rng = SeededRng::from_seed(&format!("talent:{seed}"));
        let count = rng.count(12, 24);
        let candidates = (0..count).map(|i| candidate(&mut rng, i)).collect::<Vec<_>>();
        let interviews = candidates
            .iter()
            .filter(|c| c.stage.reached_interview())
            .enumerate()
            .map(|(i, c)| interview(&mut rng, i, c))
            .collect();
        let offers = candidates
            .iter()
            .filter(|c| c.stage.reached_offer())
            .enumerate()
            .map(|(i, c)| offer(&mut rng, i, c))
            .collect();
        Self { candidates, interviews, offers }
    }

    #[must_use]
    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn candidates_in_stage(&self, stage: Option<CandidateStage>) -> Vec<&Candidate> {
        self.candidates
            .iter()
            .filter(|c| stage.is_none_or(|s| c.stage == s))
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn candidate(rng: &mut SeededRng, index: usize) -> Candidate {
    let first_name = *rng.pick(FIRST_NAMES);
    let last_name = *rng.pick(LAST_NAMES);
    let mut skills: Vec<&'static str> = Vec::new();
    for _ in 0..rng.count(2, 5) {
        let skill = *rng.pick(SKILLS);
        if !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    let (degree, field) = *rng.pick(DEGREES);
    let graduation_year = rng.range(2000, 2023) as i32;
    let mut work_history = Vec::new();
    let mut end: Option<NaiveDate> = None;
    let mut cursor = origin();
    for _ in 0..rng.count(1, 3) {
        let start = cursor - Duration::days(rng.range(300, 1500));
        work_history.push(WorkHistory {
            company: *rng.pick(COMPANIES),
            title: format!("{} {}", rng.pick(&["Junior", "Senior", "Lead"]), rng.pick(POSITIONS)),
            start_date: start,
            end_date: end,
        });
        end = Some(start - Duration::days(rng.range(0, 60)));
        cursor = start;
    }
    Candidate {
        id: format!("C-{}", 1001 + index),
        first_name,
        last_name,
        email: format!("{}.{}@mail.example", first_name.to_lowercase(), last_name.to_lowercase()),
        position: *rng.pick(POSITIONS),
        stage: *rng.pick(&CandidateStage::ALL),
        rating: f64::from(rng.range(10, 50) as i32) / 10.0,
        skills,
        education: vec![Education { institution: *rng.pick(SCHOOLS), degree, field, graduation_year }],
        work_history,
        applied_date: origin() + Duration::days(rng.range(0, 90)),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn interview(rng: &mut SeededRng, index: usize, candidate: &Candidate) -> Interview {
    let kind = *rng.pick(&[InterviewKind::Phone, InterviewKind::Technical, InterviewKind::Onsite, InterviewKind::Panel]);
    let hour = rng.range(9, 16) as u32;
    let scheduled_at = (candidate.applied_date + Duration::days(rng.range(3, 21)))
        .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN));
    let completed = candidate.stage != CandidateStage::Interview || rng.chance(0.4);
    let status = if completed {
        InterviewStatus::Completed
    } else if rng.chance(0.1) {
        InterviewStatus::Cancelled
    } else {
        InterviewStatus::Scheduled
    };
    let rated = matches!(status, InterviewStatus::Completed);
    Interview {
        id: format!("I-{}", 5001 + index),
        candidate_id: candidate.id.clone(),
        candidate_name: candidate.name(),
        position: candidate.position,
        interviewer: *rng.pick(INTERVIEWERS),
        kind,
        scheduled_at,
        status,
        rating: rated.then(|| f64::from(rng.range(2, 5) as i32)),
        feedback: if rated { Some(*rng.pick(FEEDBACK)) } else { None },
    }
}

fn offer(rng: &mut SeededRng, index: usize, candidate: &Candidate) -> Offer {
    let sent = candidate.applied_date + Duration::days(rng.range(21, 45));
    let status = if candidate.stage == CandidateStage::Hired {
        OfferStatus::Accepted
    } else {
        *rng.pick(&[OfferStatus::Draft, OfferStatus::Sent, OfferStatus::Declined])
    };
    Offer {
        id: format!("O-{}", 9001 + index),
        candidate_id: candidate.id.clone(),
        candidate_name: candidate.name(),
        position: candidate.position,
        base_salary: (rng.amount(45_000.0, 130_000.0) / 500.0).round() * 500.0,
        bonus_percent: rng.amount(0.0, 15.0),
        start_date: sent + Duration::days(rng.range(14, 30)),
        expires_on: sent + Duration::days(7),
        status,
    }
}
