use time::{Date, Duration, OffsetDateTime};
use volley::core::{ScenarioTemplate, TemplateBody};

const HISTORY_DAYS: i64 = 150;

/// Scenarios covering the clinic API: login plus the heavier read endpoints over a
/// five-month window.
pub fn clinic(today: Date) -> Vec<ScenarioTemplate> {
    let from = (today - Duration::days(HISTORY_DAYS)).to_string();
    let to = (today + Duration::days(1)).to_string();

    vec![
        ScenarioTemplate::post("Login", "/api/auth/login")
            .body(TemplateBody::Credentials)
            .anonymous(),
        ScenarioTemplate::get("Clinical histories", "/api/clinical-histories"),
        ScenarioTemplate::get("Expenses summary", "/api/odontologia/gastos/summary"),
        ScenarioTemplate::get("Expenses 5 months", "/api/odontologia/gastos")
            .query("startDate", &from)
            .query("endDate", &to),
        ScenarioTemplate::get("Purchases 5 months", "/api/odontologia/compras")
            .query("dateFrom", &from)
            .query("dateTo", &to),
        ScenarioTemplate::get("Accounting 5 months", "/api/accounting/summary")
            .query("from", &from)
            .query("to", &to),
        ScenarioTemplate::get("Financial report", "/api/odontologia/reportes/financiero")
            .query("startDate", &from)
            .query("endDate", &to),
    ]
}

pub fn clinic_today() -> Vec<ScenarioTemplate> {
    clinic(OffsetDateTime::now_utc().date())
}
