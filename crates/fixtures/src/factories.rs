// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Builder-style fixture factories.
//!
//! Every factory carries sensible defaults and per-field overrides;
//! `create` persists the object and returns the stored row (or its ID).
//! Generated names draw on a process-wide atomic sequence, so two factory
//! calls never collide on a unique column.

use std::sync::atomic::{AtomicU64, Ordering};

use studium_domain::{Gender, validate_email, validate_username};
use studium_persistence::{EnrollmentData, NewUser, SqlitePersistence, UserData};
use tracing::debug;

use crate::error::FixtureError;
use crate::seed::TEST_PASSWORD;

/// Process-wide sequence for generated fixture names and forced IDs.
static FACTORY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns the next value of the fixture sequence.
#[must_use]
pub fn next_sequence() -> u64 {
    FACTORY_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Factory for user rows.
#[derive(Debug, Clone, Default)]
pub struct UserFactory {
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<Gender>,
    is_staff: bool,
    is_superuser: bool,
    password: Option<String>,
}

impl UserFactory {
    /// Creates a factory with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the username.
    #[must_use]
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Overrides the email address.
    #[must_use]
    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    /// Overrides the first name.
    #[must_use]
    pub fn first_name(mut self, first_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self
    }

    /// Overrides the last name.
    #[must_use]
    pub fn last_name(mut self, last_name: &str) -> Self {
        self.last_name = Some(last_name.to_string());
        self
    }

    /// Overrides the gender.
    #[must_use]
    pub const fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Marks the user as staff.
    #[must_use]
    pub const fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Marks the user as a superuser.
    #[must_use]
    pub const fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    /// Overrides the password.
    #[must_use]
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Persists the user and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email fails validation, or if
    /// the insert fails (a duplicate username is a unique-constraint
    /// failure, not silently merged).
    pub fn create(self, persistence: &mut SqlitePersistence) -> Result<UserData, FixtureError> {
        let seq = next_sequence();
        let username = self.username.unwrap_or_else(|| format!("user{seq}"));
        let email = self
            .email
            .unwrap_or_else(|| format!("{username}@studium.test"));
        validate_username(&username)?;
        validate_email(&email)?;

        let new_user = NewUser {
            username: username.clone(),
            email,
            first_name: self.first_name.unwrap_or_else(|| "Test".to_string()),
            last_name: self.last_name.unwrap_or_else(|| format!("User{seq}")),
            gender: self.gender.unwrap_or_default().as_str().to_string(),
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            password: self.password.unwrap_or_else(|| TEST_PASSWORD.to_string()),
        };

        debug!(%username, "Creating fixture user");
        let user_id = persistence.create_user(&new_user)?;
        persistence
            .get_user_by_id(user_id)?
            .ok_or_else(|| FixtureError::UserVanished(username))
    }
}

/// Factory for semester rows; (year, term) is get-or-create.
#[derive(Debug, Clone)]
pub struct SemesterFactory {
    year: i32,
    term: String,
}

impl Default for SemesterFactory {
    fn default() -> Self {
        Self {
            year: 2026,
            term: "autumn".to_string(),
        }
    }
}

impl SemesterFactory {
    /// Creates a factory with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the year.
    #[must_use]
    pub const fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Overrides the term.
    #[must_use]
    pub fn term(mut self, term: &str) -> Self {
        self.term = term.to_string();
        self
    }

    /// Gets or creates the semester, returning its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails.
    pub fn create(self, persistence: &mut SqlitePersistence) -> Result<i64, FixtureError> {
        Ok(persistence.get_or_create_semester(self.year, &self.term)?)
    }
}

/// Factory for site rows (forced-ID upsert).
#[derive(Debug, Clone, Default)]
pub struct SiteFactory {
    site_id: Option<i64>,
    domain: Option<String>,
    name: Option<String>,
}

impl SiteFactory {
    /// Creates a factory with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the site ID.
    #[must_use]
    pub const fn site_id(mut self, site_id: i64) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Overrides the domain.
    #[must_use]
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    /// Overrides the display name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Upserts the site and returns its ID.
    ///
    /// Generated IDs start above the baseline range so a factory-made site
    /// never collides with the fixed sites 1 and 2.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn create(self, persistence: &mut SqlitePersistence) -> Result<i64, FixtureError> {
        let seq = next_sequence();
        let site_id = self
            .site_id
            .unwrap_or_else(|| 100 + i64::try_from(seq).unwrap_or(0));
        let domain = self
            .domain
            .unwrap_or_else(|| format!("site{seq}.studium.test"));
        let name = self.name.unwrap_or_else(|| domain.clone());

        persistence.upsert_site(site_id, &domain, &name)?;
        Ok(site_id)
    }
}

/// Factory for course rows; creates its semester on demand.
#[derive(Debug, Clone, Default)]
pub struct CourseFactory {
    semester_id: Option<i64>,
    site_id: Option<i64>,
    meta_name: Option<String>,
}

impl CourseFactory {
    /// Creates a factory with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing semester.
    #[must_use]
    pub const fn semester_id(mut self, semester_id: i64) -> Self {
        self.semester_id = Some(semester_id);
        self
    }

    /// Overrides the site (defaults to the primary baseline site).
    #[must_use]
    pub const fn site_id(mut self, site_id: i64) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Overrides the course name.
    #[must_use]
    pub fn meta_name(mut self, meta_name: &str) -> Self {
        self.meta_name = Some(meta_name.to_string());
        self
    }

    /// Persists the course and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the semester or course insert fails.
    pub fn create(self, persistence: &mut SqlitePersistence) -> Result<i64, FixtureError> {
        let semester_id = self
            .semester_id
            .map_or_else(|| SemesterFactory::new().create(persistence), Ok)?;
        let site_id = self.site_id.unwrap_or(1);
        let seq = next_sequence();
        let meta_name = self.meta_name.unwrap_or_else(|| format!("Course {seq}"));

        debug!(%meta_name, semester_id, site_id, "Creating fixture course");
        Ok(persistence.create_course(semester_id, site_id, &meta_name)?)
    }
}

/// Factory for enrollments; creates its student and course on demand.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentFactory {
    student_id: Option<i64>,
    course_id: Option<i64>,
}

impl EnrollmentFactory {
    /// Creates a factory with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing student.
    #[must_use]
    pub const fn student_id(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }

    /// Uses an existing course.
    #[must_use]
    pub const fn course_id(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// Persists the enrollment, creating student and course as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn create(
        self,
        persistence: &mut SqlitePersistence,
    ) -> Result<EnrollmentData, FixtureError> {
        let student_id = self.student_id.map_or_else(
            || UserFactory::new().create(persistence).map(|u| u.user_id),
            Ok,
        )?;
        let course_id = self
            .course_id
            .map_or_else(|| CourseFactory::new().create(persistence), Ok)?;

        let enrollment_id = persistence.create_enrollment(student_id, course_id)?;
        Ok(EnrollmentData {
            enrollment_id,
            student_id,
            course_id,
        })
    }
}

/// Factory for assignments; creates its course on demand.
#[derive(Debug, Clone, Default)]
pub struct AssignmentFactory {
    course_id: Option<i64>,
    title: Option<String>,
}

impl AssignmentFactory {
    /// Creates a factory with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing course.
    #[must_use]
    pub const fn course_id(mut self, course_id: i64) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// Overrides the UI-visible title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Persists the assignment and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn create(self, persistence: &mut SqlitePersistence) -> Result<i64, FixtureError> {
        let course_id = self
            .course_id
            .map_or_else(|| CourseFactory::new().create(persistence), Ok)?;
        let seq = next_sequence();
        let title = self.title.unwrap_or_else(|| format!("Assignment {seq}"));

        Ok(persistence.create_assignment(course_id, &title)?)
    }
}
