use actix_session::Session;
use askama::Template;

use crate::auth::session::{csrf_token, get_username};
use crate::errors::AppError;
use crate::stats::overview::Overview;
use crate::stats::report::{CHART_HEIGHT, ChartBar, Report};

pub const APP_NAME: &str = "ChronoX Admin";

/// Common context shared by all signed-in pages.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub app_name: &'static str,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, current_path: &str) -> Result<Self, AppError> {
        let username = get_username(session)?;
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            app_name: APP_NAME,
            csrf_token: csrf_token(session)?,
            current_path: current_path.to_string(),
        })
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub app_name: &'static str,
    pub csrf_token: String,
    pub email: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub overview: Overview,
}

/// Standalone report document; it does not extend the admin layout so the
/// downloaded file renders on its own.
#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate {
    pub report: Report,
    pub bars: Vec<ChartBar>,
    pub chart_height: u32,
}

impl ReportTemplate {
    pub fn new(report: Report) -> Self {
        Self {
            bars: report.chart_bars(),
            chart_height: CHART_HEIGHT,
            report,
        }
    }
}

#[derive(Template)]
#[template(path = "verify_success.html")]
pub struct VerifySuccessTemplate {
    pub app_name: &'static str,
}

#[derive(Template)]
#[template(path = "verify_error.html")]
pub struct VerifyErrorTemplate {
    pub app_name: &'static str,
    pub error: String,
}
