use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportGroup {
    Employee,
    Checks,
    Jobs,
    Salary,
    Timecards,
}

impl ReportGroup {
    pub const ALL: [Self; 5] = [Self::Employee, Self::Checks, Self::Jobs, Self::Salary, Self::Timecards];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Checks => "checks",
            Self::Jobs => "jobs",
            Self::Salary => "salary",
            Self::Timecards => "timecards",
        }
    }
}

impl fmt::Display for ReportGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group selector used by catalog listings; `all` matches every report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GroupFilter {
    #[default]
    All,
    Only(ReportGroup),
}

impl GroupFilter {
    #[must_use]
    pub fn matches(self, group: ReportGroup) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == group,
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown report group: {0}")]
pub struct UnknownGroup(pub String);

impl FromStr for GroupFilter {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if wanted == "all" || wanted.is_empty() {
            return Ok(Self::All);
        }
        ReportGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == wanted)
            .map(Self::Only)
            .ok_or_else(|| UnknownGroup(s.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct ReportDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub group: ReportGroup,
    pub estimated_fields: u32,
    pub estimated_rows: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<&'static str>,
}

#[rustfmt::skip]
static CATALOG: &[ReportDefinition] = &[
    ReportDefinition {
        id: "employee-directory",
        title: "Employee Directory",
        description: "Active and inactive employees with department, title and hire date.",
        category: "Workforce",
        group: ReportGroup::Employee,
        estimated_fields: 8,
        estimated_rows: 250,
        procedure: Some("rpt_employee_directory"),
    },
    ReportDefinition {
        id: "department-analysis",
        title: "Department Analysis",
        description: "Headcount, average salary, payroll totals and turnover per department.",
        category: "Workforce",
        group: ReportGroup::Employee,
        estimated_fields: 6,
        estimated_rows: 8,
        procedure: Some("rpt_department_analysis"),
    },
    ReportDefinition {
        id: "new-hires",
        title: "New Hires",
        description: "Employees hired during the reporting period with starting salary.",
        category: "Workforce",
        group: ReportGroup::Employee,
        estimated_fields: 7,
        estimated_rows: 40,
        procedure: None,
    },
    ReportDefinition {
        id: "terminations",
        title: "Terminations",
        description: "Separated employees with reason and tenure.",
        category: "Workforce",
        group: ReportGroup::Employee,
        estimated_fields: 6,
        estimated_rows: 20,
        procedure: None,
    },
    ReportDefinition {
        id: "payroll-register",
        title: "Payroll Register",
        description: "Check-level gross to net breakdown for each pay date.",
        category: "Payroll",
        group: ReportGroup::Checks,
        estimated_fields: 8,
        estimated_rows: 500,
        procedure: Some("rpt_payroll_register"),
    },
    ReportDefinition {
        id: "direct-deposit-summary",
        title: "Direct Deposit Summary",
        description: "Deposit amounts per employee account for each pay date.",
        category: "Payroll",
        group: ReportGroup::Checks,
        estimated_fields: 6,
        estimated_rows: 300,
        procedure: None,
    },
    ReportDefinition {
        id: "job-catalog",
        title: "Job Catalog",
        description: "Job codes with pay grade and FLSA classification.",
        category: "Jobs",
        group: ReportGroup::Jobs,
        estimated_fields: 6,
        estimated_rows: 60,
        procedure: None,
    },
    ReportDefinition {
        id: "open-positions",
        title: "Open Positions",
        description: "Open requisitions with posting date and applicant counts.",
        category: "Jobs",
        group: ReportGroup::Jobs,
        estimated_fields: 7,
        estimated_rows: 25,
        procedure: Some("rpt_open_positions"),
    },
    ReportDefinition {
        id: "salary-history",
        title: "Salary History",
        description: "Compensation changes with effective date and percent change.",
        category: "Compensation",
        group: ReportGroup::Salary,
        estimated_fields: 7,
        estimated_rows: 200,
        procedure: Some("rpt_salary_history"),
    },
    ReportDefinition {
        id: "compensation-bands",
        title: "Compensation Bands",
        description: "Minimum, midpoint and maximum pay per grade with incumbents.",
        category: "Compensation",
        group: ReportGroup::Salary,
        estimated_fields: 5,
        estimated_rows: 10,
        procedure: None,
    },
    ReportDefinition {
        id: "timecard-summary",
        title: "Timecard Summary",
        description: "Daily regular and overtime hours with approval state.",
        category: "Time & Attendance",
        group: ReportGroup::Timecards,
        estimated_fields: 7,
        estimated_rows: 1000,
        procedure: Some("rpt_timecard_summary"),
    },
    ReportDefinition {
        id: "overtime-report",
        title: "Overtime Report",
        description: "Overtime hours and pay per employee and pay period.",
        category: "Time & Attendance",
        group: ReportGroup::Timecards,
        estimated_fields: 7,
        estimated_rows: 120,
        procedure: None,
    },
    ReportDefinition {
        id: "pto-balances",
        title: "PTO Balances",
        description: "Accrued, used and remaining paid time off.",
        category: "Time & Attendance",
        group: ReportGroup::Timecards,
        estimated_fields: 6,
        estimated_rows: 250,
        procedure: None,
    },
];

#[must_use]
pub fn catalog() -> &'static [ReportDefinition] {
    CATALOG
}

#[must_use]
pub fn lookup(id: &str) -> Option<&'static ReportDefinition> {
    CATALOG.iter().find(|report| report.id == id)
}

#[must_use]
pub fn by_group(filter: GroupFilter) -> Vec<&'static ReportDefinition> {
    CATALOG.iter().filter(|report| filter.matches(report.group)).collect()
}
