/// Project and task primary keys are PostgreSQL BIGINT.
pub type DbId = i64;

/// Calendar date with no time-of-day component (deadlines, creation and close dates).
pub type Date = chrono::NaiveDate;

/// Current local calendar date.
pub fn today() -> Date {
    chrono::Local::now().date_naive()
}
