//! Records — typed rows for every table, plus list/insert/delete.
//!
//! DESIGN
//! ======
//! Each table has a closed row type (`Course`, `ContactSubmission`, ...) and
//! an insert type (`NewCourse`, ...). `Record` and `NewRecord` tag those per
//! table so handlers can stay generic over "a table" while the store layer
//! keeps compile-time column checks.
//!
//! Content tables (courses, faculty, news, student desk) use serial ids and
//! are managed by admins. Submission tables use UUIDs and are only created by
//! the public forms.
//!
//! Timestamps are rendered by Postgres as RFC 3339 UTC strings so the crate
//! does not need a date-time codec.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

macro_rules! created_at {
    () => {
        r#"to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at"#
    };
}

const COURSE_COLUMNS: &str = concat!(
    "id, title, code, department, course_type, duration, description, eligibility, ",
    created_at!()
);
const FACULTY_COLUMNS: &str = concat!(
    "id, name, department, designation, qualification, experience, specialization, phone, bio, ",
    created_at!()
);
const NEWS_COLUMNS: &str = concat!("id, title, content, publish_date, image, featured, ", created_at!());
const TOUR_COLUMNS: &str = concat!("id, title, location, date, description, image, ", created_at!());
const TOPPER_COLUMNS: &str = concat!("id, name, course, year, achievement, percentage, image, ", created_at!());
const ACHIEVER_COLUMNS: &str = concat!("id, name, sport, tournament, position, year, image, ", created_at!());
const INTERNSHIP_COLUMNS: &str = concat!(
    "id, company, role, department, duration, year, student_count, image, ",
    created_at!()
);
const PLACEMENT_COLUMNS: &str = concat!(
    "id, company, department, year, students_placed, highest_package, average_package, image, ",
    created_at!()
);
const ADMISSION_COLUMNS: &str = concat!(
    "id, name, email, phone, address, date_of_birth, course_id, guardian_name, guardian_phone, status, ",
    created_at!()
);
const VISIT_COLUMNS: &str = concat!(
    "id, name, email, phone, address, visit_date, visit_time, purpose, ",
    created_at!()
);
const CONTACT_COLUMNS: &str = concat!("id, name, email, phone, reason, ", created_at!());
const FEEDBACK_COLUMNS: &str = concat!("id, name, email, phone, feedback, rating, ", created_at!());
const SCHOLARSHIP_COLUMNS: &str = concat!(
    "id, name, email, phone, course_id, current_education, family_income, reason_for_scholarship, ",
    created_at!()
);

/// Postgres SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Postgres SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("invalid id for {table}: {raw}")]
    InvalidId { table: &'static str, raw: String },
    #[error("invalid body for {table}: {reason}")]
    InvalidBody { table: &'static str, reason: String },
    #[error("record not found")]
    NotFound,
    #[error("referenced {0} does not exist")]
    InvalidReference(&'static str),
    #[error("{0} is already taken")]
    Duplicate(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Constraint violation for a given SQLSTATE on `table`, if it maps to a
/// caller-facing error.
pub(crate) fn classify_violation(table: Table, code: &str) -> Option<RecordError> {
    match code {
        FOREIGN_KEY_VIOLATION => Some(RecordError::InvalidReference("course_id")),
        UNIQUE_VIOLATION => Some(RecordError::Duplicate(table.unique_field())),
        _ => None,
    }
}

fn map_insert_error(table: Table, err: sqlx::Error) -> RecordError {
    let classified = err
        .as_database_error()
        .and_then(|db| db.code().and_then(|code| classify_violation(table, &code)));
    classified.unwrap_or(RecordError::Database(err))
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "department")]
pub enum Department {
    #[serde(rename = "Science")]
    #[sqlx(rename = "Science")]
    Science,
    #[serde(rename = "Arts & Humanities")]
    #[sqlx(rename = "Arts & Humanities")]
    ArtsHumanities,
    #[serde(rename = "Commerce")]
    #[sqlx(rename = "Commerce")]
    Commerce,
    #[serde(rename = "Computer Science")]
    #[sqlx(rename = "Computer Science")]
    ComputerScience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    Undergraduate,
    Postgraduate,
    Diploma,
    Certificate,
}

/// Every table the site reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Courses,
    Faculty,
    News,
    EducationalTours,
    AcademicToppers,
    TournamentAchievers,
    Internships,
    PlacementStats,
    AdmissionApplications,
    CampusVisitRequests,
    ContactSubmissions,
    FeedbackSubmissions,
    ScholarshipApplications,
}

/// How a table's primary key is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Serial,
    Uuid,
}

impl Table {
    pub const ALL: [Self; 13] = [
        Self::Courses,
        Self::Faculty,
        Self::News,
        Self::EducationalTours,
        Self::AcademicToppers,
        Self::TournamentAchievers,
        Self::Internships,
        Self::PlacementStats,
        Self::AdmissionApplications,
        Self::CampusVisitRequests,
        Self::ContactSubmissions,
        Self::FeedbackSubmissions,
        Self::ScholarshipApplications,
    ];

    /// URL slug.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::Faculty => "faculty",
            Self::News => "news",
            Self::EducationalTours => "educational-tours",
            Self::AcademicToppers => "academic-toppers",
            Self::TournamentAchievers => "tournament-achievers",
            Self::Internships => "internships",
            Self::PlacementStats => "placement-stats",
            Self::AdmissionApplications => "admission-applications",
            Self::CampusVisitRequests => "campus-visit-requests",
            Self::ContactSubmissions => "contact-submissions",
            Self::FeedbackSubmissions => "feedback-submissions",
            Self::ScholarshipApplications => "scholarship-applications",
        }
    }

    /// SQL table name.
    #[must_use]
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::Faculty => "faculty",
            Self::News => "news",
            Self::EducationalTours => "educational_tours",
            Self::AcademicToppers => "academic_toppers",
            Self::TournamentAchievers => "tournament_achievers",
            Self::Internships => "internships",
            Self::PlacementStats => "placement_stats",
            Self::AdmissionApplications => "admission_applications",
            Self::CampusVisitRequests => "campus_visit_requests",
            Self::ContactSubmissions => "contact_submissions",
            Self::FeedbackSubmissions => "feedback_submissions",
            Self::ScholarshipApplications => "scholarship_applications",
        }
    }

    /// # Errors
    ///
    /// `UnknownTable` if the slug names no table.
    pub fn from_slug(raw: &str) -> Result<Self, RecordError> {
        Self::ALL
            .into_iter()
            .find(|t| t.slug() == raw)
            .ok_or_else(|| RecordError::UnknownTable(raw.to_owned()))
    }

    #[must_use]
    pub fn is_submission(self) -> bool {
        matches!(
            self,
            Self::AdmissionApplications
                | Self::CampusVisitRequests
                | Self::ContactSubmissions
                | Self::FeedbackSubmissions
                | Self::ScholarshipApplications
        )
    }

    #[must_use]
    pub fn key_kind(self) -> KeyKind {
        if self.is_submission() { KeyKind::Uuid } else { KeyKind::Serial }
    }

    /// Column guarded by the table's unique constraint.
    #[must_use]
    pub fn unique_field(self) -> &'static str {
        match self {
            Self::Courses => "code",
            _ => "id",
        }
    }
}

/// Primary key of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordId {
    Serial(i64),
    Uuid(Uuid),
}

impl RecordId {
    /// Parse a path segment according to the table's key kind.
    ///
    /// # Errors
    ///
    /// `InvalidId` if the text does not fit the key kind.
    pub fn parse(table: Table, raw: &str) -> Result<Self, RecordError> {
        let invalid = || RecordError::InvalidId { table: table.slug(), raw: raw.to_owned() };
        match table.key_kind() {
            KeyKind::Serial => raw
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .map(Self::Serial)
                .ok_or_else(invalid),
            KeyKind::Uuid => Uuid::parse_str(raw).map(Self::Uuid).map_err(|_| invalid()),
        }
    }
}

// =============================================================================
// CONTENT ROWS
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub department: Department,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub duration: String,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub code: String,
    pub department: Department,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub duration: String,
    pub description: Option<String>,
    pub eligibility: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub department: Department,
    pub designation: String,
    pub qualification: String,
    pub experience: String,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFaculty {
    pub name: String,
    pub department: Department,
    pub designation: String,
    pub qualification: String,
    pub experience: String,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub publish_date: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNews {
    pub title: String,
    pub content: String,
    pub publish_date: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EducationalTour {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub date: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEducationalTour {
    pub title: String,
    pub location: String,
    pub date: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AcademicTopper {
    pub id: i64,
    pub name: String,
    pub course: String,
    pub year: String,
    pub achievement: String,
    pub percentage: Option<f64>,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAcademicTopper {
    pub name: String,
    pub course: String,
    pub year: String,
    pub achievement: String,
    pub percentage: Option<f64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TournamentAchiever {
    pub id: i64,
    pub name: String,
    pub sport: String,
    pub tournament: String,
    pub position: String,
    pub year: String,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTournamentAchiever {
    pub name: String,
    pub sport: String,
    pub tournament: String,
    pub position: String,
    pub year: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Internship {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub department: String,
    pub duration: String,
    pub year: String,
    pub student_count: Option<i32>,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInternship {
    pub company: String,
    pub role: String,
    pub department: String,
    pub duration: String,
    pub year: String,
    pub student_count: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PlacementStat {
    pub id: i64,
    pub company: String,
    pub department: String,
    pub year: String,
    pub students_placed: i32,
    pub highest_package: Option<String>,
    pub average_package: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlacementStat {
    pub company: String,
    pub department: String,
    pub year: String,
    pub students_placed: i32,
    pub highest_package: Option<String>,
    pub average_package: Option<String>,
    pub image: Option<String>,
}

// =============================================================================
// SUBMISSION ROWS
// =============================================================================

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdmissionApplication {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub course_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAdmissionApplication {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub course_id: Option<i64>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CampusVisitRequest {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub visit_date: String,
    pub visit_time: String,
    pub purpose: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCampusVisitRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub visit_date: String,
    pub visit_time: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedbackSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub feedback: String,
    pub rating: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewFeedbackSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub feedback: String,
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScholarshipApplication {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course_id: Option<i64>,
    pub current_education: String,
    pub family_income: String,
    pub reason_for_scholarship: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewScholarshipApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course_id: Option<i64>,
    pub current_education: String,
    pub family_income: String,
    pub reason_for_scholarship: String,
}

// =============================================================================
// TAGGED VARIANTS
// =============================================================================

/// A stored row, tagged with its table.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "table", content = "row", rename_all = "kebab-case")]
pub enum Record {
    Courses(Course),
    Faculty(Faculty),
    News(News),
    EducationalTours(EducationalTour),
    AcademicToppers(AcademicTopper),
    TournamentAchievers(TournamentAchiever),
    Internships(Internship),
    PlacementStats(PlacementStat),
    AdmissionApplications(AdmissionApplication),
    CampusVisitRequests(CampusVisitRequest),
    ContactSubmissions(ContactSubmission),
    FeedbackSubmissions(FeedbackSubmission),
    ScholarshipApplications(ScholarshipApplication),
}

impl Record {
    #[must_use]
    pub fn table(&self) -> Table {
        match self {
            Self::Courses(_) => Table::Courses,
            Self::Faculty(_) => Table::Faculty,
            Self::News(_) => Table::News,
            Self::EducationalTours(_) => Table::EducationalTours,
            Self::AcademicToppers(_) => Table::AcademicToppers,
            Self::TournamentAchievers(_) => Table::TournamentAchievers,
            Self::Internships(_) => Table::Internships,
            Self::PlacementStats(_) => Table::PlacementStats,
            Self::AdmissionApplications(_) => Table::AdmissionApplications,
            Self::CampusVisitRequests(_) => Table::CampusVisitRequests,
            Self::ContactSubmissions(_) => Table::ContactSubmissions,
            Self::FeedbackSubmissions(_) => Table::FeedbackSubmissions,
            Self::ScholarshipApplications(_) => Table::ScholarshipApplications,
        }
    }

    #[must_use]
    pub fn id(&self) -> RecordId {
        match self {
            Self::Courses(r) => RecordId::Serial(r.id),
            Self::Faculty(r) => RecordId::Serial(r.id),
            Self::News(r) => RecordId::Serial(r.id),
            Self::EducationalTours(r) => RecordId::Serial(r.id),
            Self::AcademicToppers(r) => RecordId::Serial(r.id),
            Self::TournamentAchievers(r) => RecordId::Serial(r.id),
            Self::Internships(r) => RecordId::Serial(r.id),
            Self::PlacementStats(r) => RecordId::Serial(r.id),
            Self::AdmissionApplications(r) => RecordId::Uuid(r.id),
            Self::CampusVisitRequests(r) => RecordId::Uuid(r.id),
            Self::ContactSubmissions(r) => RecordId::Uuid(r.id),
            Self::FeedbackSubmissions(r) => RecordId::Uuid(r.id),
            Self::ScholarshipApplications(r) => RecordId::Uuid(r.id),
        }
    }
}

/// An insert payload, tagged with its table.
#[derive(Debug, Clone)]
pub enum NewRecord {
    Courses(NewCourse),
    Faculty(NewFaculty),
    News(NewNews),
    EducationalTours(NewEducationalTour),
    AcademicToppers(NewAcademicTopper),
    TournamentAchievers(NewTournamentAchiever),
    Internships(NewInternship),
    PlacementStats(NewPlacementStat),
    AdmissionApplications(NewAdmissionApplication),
    CampusVisitRequests(NewCampusVisitRequest),
    ContactSubmissions(NewContactSubmission),
    FeedbackSubmissions(NewFeedbackSubmission),
    ScholarshipApplications(NewScholarshipApplication),
}

impl NewRecord {
    /// Decode a JSON body as the insert type of `table`.
    ///
    /// # Errors
    ///
    /// `InvalidBody` if the JSON does not match the table's columns.
    pub fn from_json(table: Table, value: serde_json::Value) -> Result<Self, RecordError> {
        fn decode<T: serde::de::DeserializeOwned>(table: Table, value: serde_json::Value) -> Result<T, RecordError> {
            serde_json::from_value(value).map_err(|e| RecordError::InvalidBody { table: table.slug(), reason: e.to_string() })
        }

        Ok(match table {
            Table::Courses => Self::Courses(decode(table, value)?),
            Table::Faculty => Self::Faculty(decode(table, value)?),
            Table::News => Self::News(decode(table, value)?),
            Table::EducationalTours => Self::EducationalTours(decode(table, value)?),
            Table::AcademicToppers => Self::AcademicToppers(decode(table, value)?),
            Table::TournamentAchievers => Self::TournamentAchievers(decode(table, value)?),
            Table::Internships => Self::Internships(decode(table, value)?),
            Table::PlacementStats => Self::PlacementStats(decode(table, value)?),
            Table::AdmissionApplications => Self::AdmissionApplications(decode(table, value)?),
            Table::CampusVisitRequests => Self::CampusVisitRequests(decode(table, value)?),
            Table::ContactSubmissions => Self::ContactSubmissions(decode(table, value)?),
            Table::FeedbackSubmissions => Self::FeedbackSubmissions(decode(table, value)?),
            Table::ScholarshipApplications => Self::ScholarshipApplications(decode(table, value)?),
        })
    }

    #[must_use]
    pub fn table(&self) -> Table {
        match self {
            Self::Courses(_) => Table::Courses,
            Self::Faculty(_) => Table::Faculty,
            Self::News(_) => Table::News,
            Self::EducationalTours(_) => Table::EducationalTours,
            Self::AcademicToppers(_) => Table::AcademicToppers,
            Self::TournamentAchievers(_) => Table::TournamentAchievers,
            Self::Internships(_) => Table::Internships,
            Self::PlacementStats(_) => Table::PlacementStats,
            Self::AdmissionApplications(_) => Table::AdmissionApplications,
            Self::CampusVisitRequests(_) => Table::CampusVisitRequests,
            Self::ContactSubmissions(_) => Table::ContactSubmissions,
            Self::FeedbackSubmissions(_) => Table::FeedbackSubmissions,
            Self::ScholarshipApplications(_) => Table::ScholarshipApplications,
        }
    }
}

// =============================================================================
// LIST
// =============================================================================

/// Every row of `table`; newest first, courses alphabetically.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list(pool: &PgPool, table: Table) -> Result<Vec<Record>, RecordError> {
    async fn fetch<T>(pool: &PgPool, columns: &str, table: Table, order: &str) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let sql = format!("SELECT {columns} FROM {} ORDER BY {order}", table.sql_name());
        sqlx::query_as::<_, T>(&sql).fetch_all(pool).await
    }

    const NEWEST: &str = "created_at DESC, id DESC";

    let records = match table {
        Table::Courses => fetch(pool, COURSE_COLUMNS, table, "title ASC, id ASC")
            .await?
            .into_iter()
            .map(Record::Courses)
            .collect(),
        Table::Faculty => fetch(pool, FACULTY_COLUMNS, table, "name ASC, id ASC")
            .await?
            .into_iter()
            .map(Record::Faculty)
            .collect(),
        Table::News => fetch(pool, NEWS_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::News)
            .collect(),
        Table::EducationalTours => fetch(pool, TOUR_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::EducationalTours)
            .collect(),
        Table::AcademicToppers => fetch(pool, TOPPER_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::AcademicToppers)
            .collect(),
        Table::TournamentAchievers => fetch(pool, ACHIEVER_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::TournamentAchievers)
            .collect(),
        Table::Internships => fetch(pool, INTERNSHIP_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::Internships)
            .collect(),
        Table::PlacementStats => fetch(pool, PLACEMENT_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::PlacementStats)
            .collect(),
        Table::AdmissionApplications => fetch(pool, ADMISSION_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::AdmissionApplications)
            .collect(),
        Table::CampusVisitRequests => fetch(pool, VISIT_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::CampusVisitRequests)
            .collect(),
        Table::ContactSubmissions => fetch(pool, CONTACT_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::ContactSubmissions)
            .collect(),
        Table::FeedbackSubmissions => fetch(pool, FEEDBACK_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::FeedbackSubmissions)
            .collect(),
        Table::ScholarshipApplications => fetch(pool, SCHOLARSHIP_COLUMNS, table, NEWEST)
            .await?
            .into_iter()
            .map(Record::ScholarshipApplications)
            .collect(),
    };
    Ok(records)
}

// =============================================================================
// INSERT
// =============================================================================

/// Insert one row and return it as stored.
///
/// # Errors
///
/// `InvalidReference` for an unknown `course_id`, `Duplicate` for a taken
/// unique column; otherwise a database error.
pub async fn insert(pool: &PgPool, new: &NewRecord) -> Result<Record, RecordError> {
    let table = new.table();
    let record = match new {
        NewRecord::Courses(n) => {
            let sql = format!(
                "INSERT INTO courses (title, code, department, course_type, duration, description, eligibility)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COURSE_COLUMNS}"
            );
            Record::Courses(
                sqlx::query_as(&sql)
                    .bind(&n.title)
                    .bind(&n.code)
                    .bind(n.department)
                    .bind(n.course_type)
                    .bind(&n.duration)
                    .bind(&n.description)
                    .bind(&n.eligibility)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::Faculty(n) => {
            let sql = format!(
                "INSERT INTO faculty (name, department, designation, qualification, experience, specialization, phone, bio)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {FACULTY_COLUMNS}"
            );
            Record::Faculty(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(n.department)
                    .bind(&n.designation)
                    .bind(&n.qualification)
                    .bind(&n.experience)
                    .bind(&n.specialization)
                    .bind(&n.phone)
                    .bind(&n.bio)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::News(n) => {
            let sql = format!(
                "INSERT INTO news (title, content, publish_date, image, featured)
                 VALUES ($1, $2, $3, $4, $5) RETURNING {NEWS_COLUMNS}"
            );
            Record::News(
                sqlx::query_as(&sql)
                    .bind(&n.title)
                    .bind(&n.content)
                    .bind(&n.publish_date)
                    .bind(&n.image)
                    .bind(n.featured)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::EducationalTours(n) => {
            let sql = format!(
                "INSERT INTO educational_tours (title, location, date, description, image)
                 VALUES ($1, $2, $3, $4, $5) RETURNING {TOUR_COLUMNS}"
            );
            Record::EducationalTours(
                sqlx::query_as(&sql)
                    .bind(&n.title)
                    .bind(&n.location)
                    .bind(&n.date)
                    .bind(&n.description)
                    .bind(&n.image)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::AcademicToppers(n) => {
            let sql = format!(
                "INSERT INTO academic_toppers (name, course, year, achievement, percentage, image)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {TOPPER_COLUMNS}"
            );
            Record::AcademicToppers(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.course)
                    .bind(&n.year)
                    .bind(&n.achievement)
                    .bind(n.percentage)
                    .bind(&n.image)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::TournamentAchievers(n) => {
            let sql = format!(
                "INSERT INTO tournament_achievers (name, sport, tournament, position, year, image)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ACHIEVER_COLUMNS}"
            );
            Record::TournamentAchievers(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.sport)
                    .bind(&n.tournament)
                    .bind(&n.position)
                    .bind(&n.year)
                    .bind(&n.image)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::Internships(n) => {
            let sql = format!(
                "INSERT INTO internships (company, role, department, duration, year, student_count, image)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {INTERNSHIP_COLUMNS}"
            );
            Record::Internships(
                sqlx::query_as(&sql)
                    .bind(&n.company)
                    .bind(&n.role)
                    .bind(&n.department)
                    .bind(&n.duration)
                    .bind(&n.year)
                    .bind(n.student_count)
                    .bind(&n.image)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::PlacementStats(n) => {
            let sql = format!(
                "INSERT INTO placement_stats (company, department, year, students_placed, highest_package, average_package, image)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PLACEMENT_COLUMNS}"
            );
            Record::PlacementStats(
                sqlx::query_as(&sql)
                    .bind(&n.company)
                    .bind(&n.department)
                    .bind(&n.year)
                    .bind(n.students_placed)
                    .bind(&n.highest_package)
                    .bind(&n.average_package)
                    .bind(&n.image)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::AdmissionApplications(n) => {
            let sql = format!(
                "INSERT INTO admission_applications
                     (name, email, phone, address, date_of_birth, course_id, guardian_name, guardian_phone)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {ADMISSION_COLUMNS}"
            );
            Record::AdmissionApplications(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.email)
                    .bind(&n.phone)
                    .bind(&n.address)
                    .bind(&n.date_of_birth)
                    .bind(n.course_id)
                    .bind(&n.guardian_name)
                    .bind(&n.guardian_phone)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::CampusVisitRequests(n) => {
            let sql = format!(
                "INSERT INTO campus_visit_requests (name, email, phone, address, visit_date, visit_time, purpose)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {VISIT_COLUMNS}"
            );
            Record::CampusVisitRequests(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.email)
                    .bind(&n.phone)
                    .bind(&n.address)
                    .bind(&n.visit_date)
                    .bind(&n.visit_time)
                    .bind(&n.purpose)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::ContactSubmissions(n) => {
            let sql = format!(
                "INSERT INTO contact_submissions (name, email, phone, reason)
                 VALUES ($1, $2, $3, $4) RETURNING {CONTACT_COLUMNS}"
            );
            Record::ContactSubmissions(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.email)
                    .bind(&n.phone)
                    .bind(&n.reason)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::FeedbackSubmissions(n) => {
            let sql = format!(
                "INSERT INTO feedback_submissions (name, email, phone, feedback, rating)
                 VALUES ($1, $2, $3, $4, $5) RETURNING {FEEDBACK_COLUMNS}"
            );
            Record::FeedbackSubmissions(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.email)
                    .bind(&n.phone)
                    .bind(&n.feedback)
                    .bind(n.rating)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
        NewRecord::ScholarshipApplications(n) => {
            let sql = format!(
                "INSERT INTO scholarship_applications
                     (name, email, phone, course_id, current_education, family_income, reason_for_scholarship)
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {SCHOLARSHIP_COLUMNS}"
            );
            Record::ScholarshipApplications(
                sqlx::query_as(&sql)
                    .bind(&n.name)
                    .bind(&n.email)
                    .bind(&n.phone)
                    .bind(n.course_id)
                    .bind(&n.current_education)
                    .bind(&n.family_income)
                    .bind(&n.reason_for_scholarship)
                    .fetch_one(pool)
                    .await
                    .map_err(|e| map_insert_error(table, e))?,
            )
        }
    };
    Ok(record)
}

// =============================================================================
// DELETE
// =============================================================================

/// Delete one row by id.
///
/// # Errors
///
/// `NotFound` if no row matched; `InvalidId` if `id` does not fit the table.
pub async fn delete(pool: &PgPool, table: Table, id: RecordId) -> Result<(), RecordError> {
    let sql = format!("DELETE FROM {} WHERE id = $1", table.sql_name());
    let query = sqlx::query(&sql);
    let query = match (table.key_kind(), id) {
        (KeyKind::Serial, RecordId::Serial(n)) => query.bind(n),
        (KeyKind::Uuid, RecordId::Uuid(u)) => query.bind(u),
        (_, other) => {
            return Err(RecordError::InvalidId { table: table.slug(), raw: format!("{other:?}") });
        }
    };

    let result = query.execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(RecordError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
