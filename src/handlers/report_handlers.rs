use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use askama::Template;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::stats::report::{self, DateRange, Report, ReportType};
use crate::store::DocumentStore;
use crate::templates_structs::ReportTemplate;

#[derive(Deserialize)]
pub struct ReportParams {
    #[serde(rename = "type", default)]
    pub kind: ReportType,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportParams {
    fn range(&self, today: NaiveDate) -> Result<DateRange, AppError> {
        let custom = match (self.from, self.to) {
            (Some(from), Some(to)) => Some(DateRange::new(from, to).map_err(AppError::Validation)?),
            _ => None,
        };
        DateRange::for_report(self.kind, today, custom).map_err(AppError::Validation)
    }
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    #[serde(flatten)]
    report: &'a Report,
    number: String,
    period_text: String,
    analysis: Vec<String>,
    conclusion: &'static str,
}

async fn compile(store: &dyn DocumentStore, params: &ReportParams) -> Result<Report, AppError> {
    let range = params.range(Utc::now().date_naive())?;
    Ok(report::build_report(store, params.kind, range).await?)
}

/// GET /api/reports?type=monthly|quarterly|yearly|custom[&from=YYYY-MM-DD&to=YYYY-MM-DD]
pub async fn summary(
    store: web::Data<dyn DocumentStore>,
    params: web::Query<ReportParams>,
) -> Result<HttpResponse, AppError> {
    let report = compile(store.get_ref(), &params).await?;
    let body = ReportSummary {
        number: report.number(),
        period_text: report.period_text(),
        analysis: report.analysis(),
        conclusion: report.conclusion(),
        report: &report,
    };
    Ok(HttpResponse::Ok().json(body))
}

/// GET /reports/export: the report as a downloadable HTML document.
pub async fn export(
    store: web::Data<dyn DocumentStore>,
    params: web::Query<ReportParams>,
) -> Result<HttpResponse, AppError> {
    let report = compile(store.get_ref(), &params).await?;
    let filename = report.filename();
    let html = ReportTemplate::new(report).render()?;
    log::info!("Exported {filename}");

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(html))
}
