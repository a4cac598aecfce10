//! `rollcall` command line: argument parsing, route guarding and rendering.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use models::{Course, Student};
use services::{
    AttendanceSheet, CourseStatus, DerivedStatus, RowStatus, SessionView, filter_courses,
};
use std::process::ExitCode;

use crate::{
    auth::{Navigation, Route, enter},
    services::{
        auth::SignUpRequest, courses::CourseRequest, students::StudentUpdate,
    },
    state::AppState,
    views::AnalyticsReport,
};

/// Course fields shared by `create-course` and `update-course`.
#[derive(Args, Debug, Clone)]
pub struct CourseArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub start: NaiveDate,
    #[arg(long)]
    pub end: NaiveDate,
    #[arg(long)]
    pub enroll_start: NaiveDate,
    #[arg(long)]
    pub enroll_end: NaiveDate,
}

impl From<CourseArgs> for CourseRequest {
    fn from(args: CourseArgs) -> Self {
        CourseRequest {
            course_name: args.name,
            description: args.description,
            start_date: args.start,
            end_date: args.end,
            enrollment_start_date: args.enroll_start,
            enrollment_end_date: args.enroll_end,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about = "Course attendance from the terminal")]
pub struct Cli {
    /// Path to a .env file to load before reading the environment
    #[arg(long, global = true, default_value = ".env")]
    pub env: String,
    /// Print results as JSON where supported
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Present,
    Absent,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login { email: String, password: String },
    /// Create a student account
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        father_name: String,
        #[arg(long)]
        grand_father_name: Option<String>,
        #[arg(long)]
        id_number: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the remembered role
    Whoami,
    /// List courses (all for admins, enrolled for students)
    Courses {
        #[arg(long)]
        status: Option<CourseStatus>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Course catalogue by semester with enrollment flags (student)
    Catalogue,
    /// Enroll yourself in a course (student)
    Join { course_id: i64 },
    /// Your sessions for a course, oldest first (student)
    Attendance { course_id: i64 },
    /// Submit a code for the course's open session (student)
    Submit { course_id: i64, code: String },
    /// Change your year of study (student)
    SetYear { year: i32 },
    /// Sessions of a course, most recent first (admin)
    Sessions { course_id: i64 },
    /// Student-by-session attendance grid (admin)
    Sheet { course_id: i64 },
    /// Open a new attendance session (admin)
    Open {
        course_id: i64,
        /// Window length; defaults to ATTENDANCE_WINDOW_MINUTES
        #[arg(long)]
        minutes: Option<i64>,
        /// Leave out to let the backend generate one
        #[arg(long)]
        code: Option<String>,
    },
    /// Mark one student in one session (admin)
    Mark {
        course_id: i64,
        session_id: i64,
        student_id: i64,
        #[arg(value_enum)]
        mark: Mark,
    },
    /// Create a course (admin)
    CreateCourse(CourseArgs),
    /// Replace a course's details (admin)
    UpdateCourse {
        course_id: i64,
        #[command(flatten)]
        course: CourseArgs,
    },
    /// Delete a course (admin)
    DeleteCourse { course_id: i64 },
    /// List or search students (admin)
    Students {
        #[arg(long)]
        search: Option<String>,
    },
    /// Edit a student's year or department (admin)
    UpdateStudent {
        student_id: i64,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Delete a student (admin)
    DeleteStudent { student_id: i64 },
    /// Students enrolled in a course (admin)
    Roster { course_id: i64 },
    /// Enroll a student in a course (admin)
    Enroll { student_id: i64, course_id: i64 },
    /// Remove a student from a course (admin)
    Unenroll { student_id: i64, course_id: i64 },
    /// Admin analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommand {
    /// Today's sessions and attendance rate
    Overview,
    Courses,
    Trend,
    Summary,
    Top,
    AtRisk { course_id: i64 },
    Course { course_id: i64 },
    Session { session_id: i64 },
    Participation { course_id: i64 },
    Effectiveness { course_id: i64 },
    Department { name: String },
    StudentMonthly { student_id: i64, year: i32, month: u32 },
    CourseMonthly { course_id: i64, year: i32, month: u32 },
}

impl AnalyticsCommand {
    fn report(&self) -> Option<AnalyticsReport> {
        use AnalyticsReport as R;
        Some(match self {
            Self::Overview => return None,
            Self::Courses => R::CourseList,
            Self::Trend => R::AttendanceTrend,
            Self::Summary => R::CoursesSummary,
            Self::Top => R::TopMetrics,
            Self::AtRisk { course_id } => R::AtRiskStudents(*course_id),
            Self::Course { course_id } => R::CourseAttendance(*course_id),
            Self::Session { session_id } => R::SessionBreakdown(*session_id),
            Self::Participation { course_id } => R::Participation(*course_id),
            Self::Effectiveness { course_id } => R::SessionEffectiveness(*course_id),
            Self::Department { name } => R::Department(name.clone()),
            Self::StudentMonthly {
                student_id,
                year,
                month,
            } => R::StudentMonthly {
                student_id: *student_id,
                year: *year,
                month: *month,
            },
            Self::CourseMonthly {
                course_id,
                year,
                month,
            } => R::CourseMonthly {
                course_id: *course_id,
                year: *year,
                month: *month,
            },
        })
    }
}

impl Command {
    /// Route whose guard applies to this command. `courses` depends on who is asking.
    pub fn route(&self, state: &AppState) -> Route {
        match self {
            Command::Login { .. } | Command::Logout | Command::Whoami => Route::Login,
            Command::Signup { .. } => Route::SignUp,
            Command::Courses { .. } => match state.context().role {
                Some(role) => Route::home_for(role),
                None => Route::StudentCourses,
            },
            Command::Catalogue | Command::Join { .. } => Route::StudentCourses,
            Command::Attendance { course_id } => Route::StudentCourseDetail(*course_id),
            Command::Submit { .. } => Route::StudentAttendance,
            Command::SetYear { .. } => Route::StudentSettings,
            Command::Sessions { course_id }
            | Command::Sheet { course_id }
            | Command::Open { course_id, .. }
            | Command::Mark { course_id, .. } => Route::AdminCourseDetail(*course_id),
            Command::CreateCourse(_) => Route::AdminCreateCourse,
            Command::UpdateCourse { course_id, .. } => Route::AdminCourseDetail(*course_id),
            Command::DeleteCourse { .. } => Route::AdminCourses,
            Command::Students { .. }
            | Command::UpdateStudent { .. }
            | Command::DeleteStudent { .. } => Route::AdminStudents,
            Command::Roster { .. } | Command::Enroll { .. } | Command::Unenroll { .. } => {
                Route::AdminEnrollment
            }
            Command::Analytics(_) => Route::AdminAnalytics,
        }
    }
}

fn status_label(status: RowStatus) -> colored::ColoredString {
    match status {
        RowStatus::Known(DerivedStatus::Present) => "present".green(),
        RowStatus::Known(DerivedStatus::Absent) => "absent".red(),
        RowStatus::Known(DerivedStatus::Pending) => "pending".yellow(),
        RowStatus::Known(DerivedStatus::Expired) => "expired".dimmed(),
        RowStatus::Unknown => "unknown".magenta(),
    }
}

fn course_status_label(status: CourseStatus) -> colored::ColoredString {
    match status {
        CourseStatus::Upcoming => "upcoming".cyan(),
        CourseStatus::Current => "current".green(),
        CourseStatus::Past => "past".dimmed(),
    }
}

fn when(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

fn print_session_view(view: &SessionView) {
    if view.rows.is_empty() {
        println!("{}", "No attendance sessions yet".dimmed());
        return;
    }
    for row in &view.rows {
        let marker = if row.actionable { "→".bold() } else { " ".normal() };
        println!(
            "{marker} #{:<5} {:<8} {} – {}  {}",
            row.session_id,
            row.code,
            when(row.opens_at),
            when(row.closes_at),
            status_label(row.status)
        );
    }
}

fn print_sheet(sheet: &AttendanceSheet) {
    if sheet.columns.is_empty() {
        println!("{}", "No attendance sessions yet".dimmed());
        return;
    }
    let header: Vec<String> = sheet
        .columns
        .iter()
        .map(|c| format!("#{}", c.session_id))
        .collect();
    println!("{:<12} {:<24} {}", "ID", "Name", header.join("  "));
    for row in &sheet.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| match c {
                RowStatus::Known(DerivedStatus::Present) => "P".green().to_string(),
                RowStatus::Known(DerivedStatus::Absent) => "A".red().to_string(),
                RowStatus::Known(DerivedStatus::Pending) => "·".yellow().to_string(),
                RowStatus::Known(DerivedStatus::Expired) => "-".dimmed().to_string(),
                RowStatus::Unknown => "?".magenta().to_string(),
            })
            .collect();
        println!("{:<12} {:<24} {}", row.id_number, row.name, cells.join("  "));
    }
    for c in &sheet.columns {
        println!(
            "#{:<5} {}  present {}  absent {}  unmarked {}",
            c.session_id,
            when(c.opened_at),
            c.present.to_string().green(),
            c.absent.to_string().red(),
            c.unmarked
        );
    }
}

fn print_courses(courses: &[(&Course, CourseStatus)]) {
    if courses.is_empty() {
        println!("{}", "No courses match".dimmed());
    }
    for (course, status) in courses {
        println!(
            "#{:<5} {:<32} {}",
            course.id,
            course.course_name,
            course_status_label(*status)
        );
    }
}

fn print_students(students: &[Student]) {
    if students.is_empty() {
        println!("{}", "No students found".dimmed());
    }
    for s in students {
        println!(
            "#{:<5} {:<12} {:<28} {}",
            s.id,
            s.id_number,
            s.display_name(),
            s.department.as_deref().unwrap_or("-")
        );
    }
}

fn done(msg: Option<String>, fallback: &str) {
    println!("{} {}", "done".green(), msg.unwrap_or_else(|| fallback.to_owned()));
}

/// Runs one command. Errors are already user-facing when they reach the caller.
pub async fn run(cli: Cli, state: &AppState) -> Result<ExitCode> {
    let route = cli.command.route(state);
    match enter(route, state.session())? {
        Navigation::Allow(_) => {}
        Navigation::Redirect(to) => {
            eprintln!(
                "{} {} requires a different role; go to {} (try `rollcall login`)",
                "denied".red(),
                route,
                to
            );
            return Ok(ExitCode::from(2));
        }
    }

    let json = cli.json;
    match cli.command {
        Command::Login { email, password } => {
            let role = state.login(&email, &password).await?;
            println!("{} signed in as {}", "done".green(), role.to_string().bold());
            println!("home: {}", Route::home_for(role));
        }
        Command::Signup {
            first_name,
            father_name,
            grand_father_name,
            id_number,
            email,
            password,
            department,
            year,
        } => {
            let req = SignUpRequest {
                first_name,
                father_name,
                grand_father_name,
                id_number,
                email,
                password,
                department,
                year,
            };
            let role = state.sign_up(&req).await?;
            println!("{} account created ({})", "done".green(), role);
        }
        Command::Logout => {
            state.logout().await?;
            println!("{} signed out", "done".green());
        }
        Command::Whoami => {
            let saved = state.session().load()?;
            match (saved.role, saved.email) {
                (Some(role), email) => println!(
                    "{} {}",
                    role.to_string().bold(),
                    email.unwrap_or_default()
                ),
                (None, _) => println!("{}", "not signed in".dimmed()),
            }
        }
        Command::Courses { status, search } => {
            let courses = match state.context().role {
                Some(role) if role.is_admin() => state.all_courses().await?,
                _ => state.my_courses().await?,
            };
            let filtered = filter_courses(&courses, status, &search, Utc::now());
            if json {
                let list: Vec<_> = filtered.iter().map(|(c, _)| *c).collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                print_courses(&filtered);
            }
        }
        Command::Catalogue => {
            let profile = state.my_profile().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&*profile)?);
            } else {
                for semester in &profile.semesters {
                    println!("{}", semester.semester.bold());
                    for entry in &semester.courses {
                        let flag = if entry.enrolled {
                            "enrolled".green()
                        } else {
                            "open".normal()
                        };
                        println!("  #{:<5} {:<32} {}", entry.course.id, entry.course.course_name, flag);
                    }
                }
            }
        }
        Command::Join { course_id } => done(state.self_enroll(course_id).await?, "enrolled"),
        Command::Attendance { course_id } => {
            let view = state.student_course_view(course_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view.sessions)?);
            } else {
                println!("{}", view.course.course_name.bold());
                print_session_view(&view.sessions);
                if let Some(id) = view.sessions.actionable_session_id {
                    println!("submit a code for session #{id} with `rollcall submit {course_id} <code>`");
                }
            }
        }
        Command::Submit { course_id, code } => {
            let outcome = state.submit_code(course_id, &code).await?;
            done(
                outcome.message,
                &format!("attendance recorded for session #{}", outcome.session_id),
            );
        }
        Command::SetYear { year } => {
            let student = state.update_my_year(year).await?;
            println!("{} year set to {}", "done".green(), student.year.unwrap_or(year));
        }
        Command::Sessions { course_id } => {
            let view = state.admin_session_view(course_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_session_view(&view);
            }
        }
        Command::Sheet { course_id } => {
            let sheet = state.attendance_sheet(course_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                print_sheet(&sheet);
            }
        }
        Command::Open {
            course_id,
            minutes,
            code,
        } => {
            let msg = state.open_session(course_id, minutes, code.as_deref()).await?;
            done(msg, "attendance session opened");
            print_session_view(&state.admin_session_view(course_id).await?);
        }
        Command::Mark {
            course_id,
            session_id,
            student_id,
            mark,
        } => {
            let msg = state
                .mark_attendance(course_id, session_id, student_id, mark == Mark::Present)
                .await?;
            done(msg, "attendance updated");
        }
        Command::CreateCourse(args) => {
            let course = state.create_course(&args.into()).await?;
            println!("{} created course #{} {}", "done".green(), course.id, course.course_name);
        }
        Command::UpdateCourse { course_id, course } => {
            let course = state.update_course(course_id, &course.into()).await?;
            println!("{} updated course #{} {}", "done".green(), course.id, course.course_name);
        }
        Command::DeleteCourse { course_id } => {
            done(state.delete_course(course_id).await?, "course deleted")
        }
        Command::Students { search } => {
            let students = match search.as_deref().map(str::trim) {
                Some(term) if !term.is_empty() => state.search_students(term).await?,
                _ => state.students().await?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&*students)?);
            } else {
                print_students(&students);
            }
        }
        Command::UpdateStudent {
            student_id,
            year,
            department,
        } => {
            let student = state
                .update_student(student_id, &StudentUpdate { year, department })
                .await?;
            println!("{} updated {}", "done".green(), student.display_name());
        }
        Command::DeleteStudent { student_id } => {
            done(state.delete_student(student_id).await?, "student deleted")
        }
        Command::Roster { course_id } => {
            let students = state.enrolled_students(course_id).await?;
            print_students(&students);
        }
        Command::Enroll {
            student_id,
            course_id,
        } => done(state.enroll(student_id, course_id).await?, "student enrolled"),
        Command::Unenroll {
            student_id,
            course_id,
        } => done(
            state.unenroll(student_id, course_id).await?,
            "student unenrolled",
        ),
        Command::Analytics(cmd) => match cmd.report() {
            None => {
                let overview = state.daily_overview().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&*overview)?);
                } else {
                    println!("sessions today  {}", overview.total_sessions_today);
                    println!(
                        "present         {}",
                        overview.total_students_present_today.to_string().green()
                    );
                    println!(
                        "absent          {}",
                        overview.total_students_absent_today.to_string().red()
                    );
                    println!("rate            {:.1}%", overview.display_rate());
                }
            }
            Some(report) => {
                let data = state.analytics_report(&report).await?;
                println!("{}", serde_json::to_string_pretty(&*data)?);
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}
