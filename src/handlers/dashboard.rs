use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Timelike, Utc};

use crate::errors::{AppError, render};
use crate::stats::overview;
use crate::store::DocumentStore;
use crate::templates_structs::{DashboardTemplate, PageContext};

fn time_greeting(username: &str) -> String {
    let period = match Utc::now().hour() {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    format!("{period}, {username}")
}

pub async fn index(
    session: Session,
    store: web::Data<dyn DocumentStore>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, "/dashboard")?;
    let overview = overview::weekly_overview(store.get_ref()).await?;

    let tmpl = DashboardTemplate {
        greeting: time_greeting(&ctx.username),
        ctx,
        overview,
    };
    render(tmpl)
}
