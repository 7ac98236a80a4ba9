use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::reports::{ReportDefinition, ReportError, ReportTable, SeededRng, round_cents};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chen", "Dana", "Elena", "Farah", "Gabriel", "Hiro", "Isabel", "Jamal",
    "Kavya", "Liam", "Maya", "Noah", "Olivia", "Priya", "Quinn", "Rafael", "Sofia", "Tomas",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Castillo", "Dubois", "Evans", "Fischer", "Garcia", "Huang", "Ivanova", "Johnson",
    "Kowalski", "Lopez", "Mendes", "Nguyen", "Okafor", "Patel", "Rossi", "Schmidt", "Tanaka", "Williams",
];

const DEPARTMENTS: &[&str] = &[
    "Engineering", "Finance", "Human Resources", "Marketing", "Operations", "Sales", "Customer Success", "Legal",
];

const JOB_TITLES: &[&str] = &[
    "Analyst", "Specialist", "Coordinator", "Manager", "Senior Manager", "Director", "Associate", "Engineer",
    "Administrator", "Consultant",
];

const LOCATIONS: &[&str] = &["Oklahoma City, OK", "Dallas, TX", "Denver, CO", "Remote", "Chicago, IL", "Atlanta, GA"];

const BANKS: &[&str] = &["First National", "Citizens Trust", "Frontier Credit Union", "Summit Bank", "Harbor Savings"];

const TERMINATION_REASONS: &[&str] = &["Resignation", "Relocation", "Retirement", "Performance", "Position eliminated", "Contract ended"];

const SALARY_CHANGE_REASONS: &[&str] = &["Merit increase", "Promotion", "Market adjustment", "Cost of living", "Role change"];

/// Produces the rows of a catalog report for the given seed.
///
/// The generator is keyed by `"{report_id}:{seed}"`, so two reports never
/// share a sequence and the same seed always yields the same rows.
pub fn generate(report: &ReportDefinition, seed: &str) -> Result<ReportTable, ReportError> {
    let mut rng = SeededRng::from_seed(&format!("{}:{seed}", report.id));
    let table = match report.id {
        "employee-directory" => ReportTable::from_records(&employee_directory(&mut rng)),
        "department-analysis" => ReportTable::from_records(&department_analysis(&mut rng)),
        "new-hires" => ReportTable::from_records(&new_hires(&mut rng)),
        "terminations" => ReportTable::from_records(&terminations(&mut rng)),
        "payroll-register" => ReportTable::from_records(&payroll_register(&mut rng)),
        "direct-deposit-summary" => ReportTable::from_records(&direct_deposit_summary(&mut rng)),
        "job-catalog" => ReportTable::from_records(&job_catalog(&mut rng)),
        "open-positions" => ReportTable::from_records(&open_positions(&mut rng)),
        "salary-history" => ReportTable::from_records(&salary_history(&mut rng)),
        "compensation-bands" => ReportTable::from_records(&compensation_bands(&mut rng)),
        "timecard-summary" => ReportTable::from_records(&timecard_summary(&mut rng)),
        "overtime-report" => ReportTable::from_records(&overtime_report(&mut rng)),
        "pto-balances" => ReportTable::from_records(&pto_balances(&mut rng)),
        other => return Err(ReportError::MissingGenerator(other.to_string())),
    }?;
    tracing::debug!(report_id = report.id, seed, rows = table.len(), "Generated report rows");
    Ok(table)
}

struct Person {
    employee_id: String,
    first_name: &'static str,
    last_name: &'static str,
    department: &'static str,
}

impl Person {
    fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn people(rng: &mut SeededRng, count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| Person {
            employee_id: format!("E{}", 1001 + i),
            first_name: *rng.pick(FIRST_NAMES),
            last_name: *rng.pick(LAST_NAMES),
            department: *rng.pick(DEPARTMENTS),
        })
        .collect()
}

// All dates hang off a fixed origin so output never depends on the clock.
fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn day(offset: i64) -> String {
    (origin() + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

#[allow(clippy::cast_precision_loss)]
fn quarters(quarter_hours: i64) -> f64 {
    quarter_hours as f64 / 4.0
}

#[derive(Debug, Serialize)]
struct EmployeeDirectoryRow {
    employee_id: String,
    first_name: &'static str,
    last_name: &'static str,
    department: &'static str,
    job_title: &'static str,
    email: String,
    hire_date: String,
    status: &'static str,
}

fn employee_directory(rng: &mut SeededRng) -> Vec<EmployeeDirectoryRow> {
    let count = rng.count(20, 40);
    people(rng, count)
        .into_iter()
        .map(|p| {
            let status = match rng.next_f64() {
                x if x < 0.85 => "Active",
                x if x < 0.90 => "Leave",
                _ => "Terminated",
            };
            EmployeeDirectoryRow {
                email: format!("{}.{}@example.com", p.first_name.to_lowercase(), p.last_name.to_lowercase()),
                employee_id: p.employee_id,
                first_name: p.first_name,
                last_name: p.last_name,
                department: p.department,
                job_title: *rng.pick(JOB_TITLES),
                hire_date: day(-rng.range(30, 3650)),
                status,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct DepartmentAnalysisRow {
    department: &'static str,
    headcount: i64,
    average_salary: f64,
    total_payroll: f64,
    turnover_rate: f64,
    open_positions: i64,
}

#[allow(clippy::cast_precision_loss)]
fn department_analysis(rng: &mut SeededRng) -> Vec<DepartmentAnalysisRow> {
    DEPARTMENTS
        .iter()
        .map(|department| {
            let headcount = rng.range(5, 60);
            let average_salary = rng.amount(55_000.0, 140_000.0);
            DepartmentAnalysisRow {
                department,
                headcount,
                average_salary,
                total_payroll: round_cents(headcount as f64 * average_salary),
                turnover_rate: rng.amount(2.0, 18.0),
                open_positions: rng.range(0, 6),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct NewHireRow {
    employee_id: String,
    name: String,
    department: &'static str,
    job_title: &'static str,
    hire_date: String,
    salary: f64,
    manager: String,
}

fn new_hires(rng: &mut SeededRng) -> Vec<NewHireRow> {
    let count = rng.count(8, 20);
    people(rng, count)
        .into_iter()
        .map(|p| NewHireRow {
            name: p.name(),
            employee_id: p.employee_id,
            department: p.department,
            job_title: *rng.pick(JOB_TITLES),
            hire_date: day(rng.range(0, 180)),
            salary: rng.amount(42_000.0, 150_000.0),
            manager: format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES)),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct TerminationRow {
    employee_id: String,
    name: String,
    department: &'static str,
    termination_date: String,
    reason: &'static str,
    tenure_years: f64,
}

fn terminations(rng: &mut SeededRng) -> Vec<TerminationRow> {
    let count = rng.count(5, 15);
    people(rng, count)
        .into_iter()
        .map(|p| TerminationRow {
            name: p.name(),
            employee_id: p.employee_id,
            department: p.department,
            termination_date: day(rng.range(0, 180)),
            reason: *rng.pick(TERMINATION_REASONS),
            tenure_years: rng.amount(0.2, 15.0),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct PayrollRegisterRow {
    check_number: i64,
    employee_id: String,
    name: String,
    check_date: String,
    gross_pay: f64,
    taxes: f64,
    deductions: f64,
    net_pay: f64,
}

fn payroll_register(rng: &mut SeededRng) -> Vec<PayrollRegisterRow> {
    let count = rng.count(10, 18);
    let staff = people(rng, count);
    let mut check_number = 100_001;
    let mut rows = Vec::with_capacity(staff.len() * 3);
    for period in 0..3 {
        let check_date = day(period * 14 + 4);
        for p in &staff {
            let gross_pay = rng.amount(1_800.0, 6_500.0);
            let taxes = round_cents(gross_pay * rng.amount(0.18, 0.28));
            let deductions = rng.amount(50.0, 400.0);
            rows.push(PayrollRegisterRow {
                check_number,
                employee_id: p.employee_id.clone(),
                name: p.name(),
                check_date: check_date.clone(),
                gross_pay,
                taxes,
                deductions,
                net_pay: round_cents(gross_pay - taxes - deductions),
            });
            check_number += 1;
        }
    }
    rows
}

#[derive(Debug, Serialize)]
struct DirectDepositRow {
    employee_id: String,
    name: String,
    bank_name: &'static str,
    account_type: &'static str,
    pay_date: String,
    amount: f64,
}

fn direct_deposit_summary(rng: &mut SeededRng) -> Vec<DirectDepositRow> {
    let count = rng.count(10, 18);
    let staff = people(rng, count);
    let accounts: Vec<(&'static str, &'static str)> = staff
        .iter()
        .map(|_| (*rng.pick(BANKS), if rng.chance(0.8) { "Checking" } else { "Savings" }))
        .collect();
    let mut rows = Vec::with_capacity(staff.len() * 2);
    for period in 0..2 {
        let pay_date = day(period * 14 + 4);
        for (p, &(bank_name, account_type)) in staff.iter().zip(&accounts) {
            rows.push(DirectDepositRow {
                employee_id: p.employee_id.clone(),
                name: p.name(),
                bank_name,
                account_type,
                pay_date: pay_date.clone(),
                amount: rng.amount(1_200.0, 4_800.0),
            });
        }
    }
    rows
}

#[derive(Debug, Serialize)]
struct JobCatalogRow {
    job_code: String,
    title: String,
    department: &'static str,
    pay_grade: String,
    flsa_status: &'static str,
    active: bool,
}

fn job_catalog(rng: &mut SeededRng) -> Vec<JobCatalogRow> {
    let count = rng.count(12, 24);
    (0..count)
        .map(|i| {
            let department = *rng.pick(DEPARTMENTS);
            let title = *rng.pick(JOB_TITLES);
            JobCatalogRow {
                job_code: format!("JC-{}", 101 + i),
                title: format!("{department} {title}"),
                department,
                pay_grade: format!("G{}", rng.range(1, 8)),
                flsa_status: if rng.chance(0.6) { "Exempt" } else { "Non-Exempt" },
                active: rng.chance(0.9),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct OpenPositionRow {
    requisition_id: String,
    title: String,
    department: &'static str,
    location: &'static str,
    posted_date: String,
    applicants: i64,
    hiring_manager: String,
}

fn open_positions(rng: &mut SeededRng) -> Vec<OpenPositionRow> {
    let count = rng.count(6, 16);
    (0..count)
        .map(|i| {
            let department = *rng.pick(DEPARTMENTS);
            OpenPositionRow {
                requisition_id: format!("REQ-2024-{:03}", i + 1),
                title: format!("{department} {}", rng.pick(JOB_TITLES)),
                department,
                location: *rng.pick(LOCATIONS),
                posted_date: day(rng.range(0, 120)),
                applicants: rng.range(0, 85),
                hiring_manager: format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES)),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct SalaryHistoryRow {
    employee_id: String,
    name: String,
    effective_date: String,
    previous_salary: f64,
    new_salary: f64,
    change_percent: f64,
    reason: &'static str,
}

fn salary_history(rng: &mut SeededRng) -> Vec<SalaryHistoryRow> {
    let count = rng.count(10, 20);
    people(rng, count)
        .into_iter()
        .map(|p| {
            let previous_salary = rng.amount(40_000.0, 140_000.0);
            let new_salary = round_cents(previous_salary * (1.0 + rng.amount(0.01, 0.15)));
            SalaryHistoryRow {
                name: p.name(),
                employee_id: p.employee_id,
                effective_date: day(rng.range(0, 300)),
                previous_salary,
                new_salary,
                change_percent: round_cents((new_salary - previous_salary) / previous_salary * 100.0),
                reason: *rng.pick(SALARY_CHANGE_REASONS),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct CompensationBandRow {
    pay_grade: String,
    minimum: f64,
    midpoint: f64,
    maximum: f64,
    employees: i64,
}

fn compensation_bands(rng: &mut SeededRng) -> Vec<CompensationBandRow> {
    (1..=8_i32)
        .map(|grade| {
            let minimum = round_cents(f64::from(grade).mul_add(12_000.0, 23_000.0) + rng.amount(0.0, 3_000.0));
            let maximum = round_cents(minimum * 1.5);
            CompensationBandRow {
                pay_grade: format!("G{grade}"),
                minimum,
                midpoint: round_cents((minimum + maximum) / 2.0),
                maximum,
                employees: rng.range(0, 45),
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct TimecardRow {
    employee_id: String,
    name: String,
    work_date: String,
    regular_hours: f64,
    overtime_hours: f64,
    total_hours: f64,
    approved: bool,
}

fn timecard_summary(rng: &mut SeededRng) -> Vec<TimecardRow> {
    let count = rng.count(4, 8);
    let staff = people(rng, count);
    let mut rows = Vec::new();
    // two work weeks, Monday through Friday
    for week in 0..2 {
        for weekday in 0..5 {
            let work_date = day(week * 7 + weekday);
            for p in &staff {
                let regular_hours = quarters(rng.range(24, 32));
                let overtime_hours = if rng.chance(0.25) { quarters(rng.range(1, 12)) } else { 0.0 };
                rows.push(TimecardRow {
                    employee_id: p.employee_id.clone(),
                    name: p.name(),
                    work_date: work_date.clone(),
                    regular_hours,
                    overtime_hours,
                    total_hours: regular_hours + overtime_hours,
                    approved: rng.chance(0.8),
                });
            }
        }
    }
    rows
}

#[derive(Debug, Serialize)]
struct OvertimeRow {
    employee_id: String,
    name: String,
    department: &'static str,
    period_start: String,
    period_end: String,
    overtime_hours: f64,
    overtime_pay: f64,
}

fn overtime_report(rng: &mut SeededRng) -> Vec<OvertimeRow> {
    let count = rng.count(6, 12);
    let staff = people(rng, count);
    let mut rows = Vec::new();
    for period in 0..3 {
        let start = period * 14;
        for p in &staff {
            let overtime_hours = quarters(rng.range(0, 60));
            let hourly_rate = rng.amount(20.0, 55.0);
            rows.push(OvertimeRow {
                employee_id: p.employee_id.clone(),
                name: p.name(),
                department: p.department,
                period_start: day(start),
                period_end: day(start + 13),
                overtime_hours,
                overtime_pay: round_cents(overtime_hours * hourly_rate * 1.5),
            });
        }
    }
    rows
}

#[derive(Debug, Serialize)]
struct PtoBalanceRow {
    employee_id: String,
    name: String,
    accrued_hours: f64,
    used_hours: f64,
    balance_hours: f64,
    as_of_date: String,
}

fn pto_balances(rng: &mut SeededRng) -> Vec<PtoBalanceRow> {
    let count = rng.count(12, 30);
    let as_of_date = day(90);
    people(rng, count)
        .into_iter()
        .map(|p| {
            let accrued_hours = quarters(rng.range(160, 640));
            let used_hours = quarters(rng.range(0, 480)).min(accrued_hours);
            PtoBalanceRow {
                name: p.name(),
                employee_id: p.employee_id,
                accrued_hours,
                used_hours,
                balance_hours: accrued_hours - used_hours,
                as_of_date: as_of_date.clone(),
            }
        })
        .collect()
}
