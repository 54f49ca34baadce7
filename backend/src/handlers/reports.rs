use axum::{extract::State, Json};

use crate::{
    error::AppError,
    models::report::DailyReport,
    repositories::report as report_repo,
    state::AppState,
    utils::time::{local_date, local_day_bounds},
};

/// Today's takings and spend in the configured timezone, plus the all-time
/// best sellers.
pub async fn daily_report(State(state): State<AppState>) -> Result<Json<DailyReport>, AppError> {
    let now = state.clock.now();
    let tz = state.config.time_zone;
    let (from, to) = local_day_bounds(now, &tz);

    let (sales_total_cents, sales_count) = report_repo::sales_totals(&state.pool, from, to).await?;
    let purchases_total_cents = report_repo::purchases_total(&state.pool, from, to).await?;
    let top_products = report_repo::top_products(&state.pool).await?;

    Ok(Json(DailyReport {
        date: local_date(now, &tz),
        sales_total_cents,
        sales_count,
        purchases_total_cents,
        top_products,
    }))
}
