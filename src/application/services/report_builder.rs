//! Report Builder
//!
//! Turns the aggregate queries into Apache ECharts option objects and
//! renders them into one self-contained HTML page. The page loads the
//! ECharts runtime from its CDN; everything else is inlined.

use crate::persistence::models::{SpendSplit, VenueAggregate, WeeklyOrderCount};
use crate::persistence::repository::OrderRepository;
use crate::persistence::DatabaseError;
use chrono::NaiveDate;
use minijinja::{context, Environment};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

const REPORT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{{ title }}</title>
    <script src="{{ echarts_src|safe }}"></script>
    <style>.container { display: flex; justify-content: center; align-items: center; } .item { margin: auto; }</style>
</head>
<body>
{% for chart in charts %}
<div class="container">
    <div class="item" id="{{ chart.id }}" style="width:{{ chart.width }};height:{{ chart.height }};"></div>
</div>
<script type="text/javascript">
    "use strict";
    let chart_{{ chart.id }} = echarts.init(document.getElementById('{{ chart.id }}'), "white");
    let option_{{ chart.id }} = {{ chart.options|safe }};
    chart_{{ chart.id }}.setOption(option_{{ chart.id }});
</script>
{% endfor %}
</body>
</html>
"#;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report query failed: {0}")]
    Query(#[from] DatabaseError),

    #[error("Failed to render report: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize chart options: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// One chart of the page
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub width: String,
    pub height: String,
    pub options: Value,
}

/// Template-facing view of a chart
#[derive(Serialize)]
struct ChartView {
    id: String,
    width: String,
    height: String,
    options: String,
}

impl Chart {
    /// Line chart of weekly order counts
    pub fn weekly_orders(title: &str, weeks: &[WeeklyOrderCount]) -> Self {
        let labels: Vec<&str> = weeks.iter().map(|w| w.year_week.as_str()).collect();
        let counts: Vec<i64> = weeks.iter().map(|w| w.order_count).collect();

        Chart {
            title: title.to_string(),
            width: "1500px".to_string(),
            height: "500px".to_string(),
            options: json!({
                "title": { "text": title },
                "tooltip": { "show": true },
                "legend": {},
                "xAxis": [{ "type": "category", "data": labels }],
                "yAxis": [{ "type": "value" }],
                "series": [{ "name": "Orders", "type": "line", "data": counts }],
            }),
        }
    }

    /// Horizontal bar chart, one bar per venue, value labels on the right
    pub fn venue_bars(title: &str, venues: &[VenueAggregate]) -> Self {
        let names: Vec<&str> = venues.iter().map(|v| v.venue_name.as_str()).collect();
        let values: Vec<f64> = venues.iter().map(|v| v.venue_value).collect();

        Chart {
            title: title.to_string(),
            width: "1500px".to_string(),
            height: "2000px".to_string(),
            options: json!({
                "title": { "text": title },
                "tooltip": { "show": true },
                "legend": {},
                "xAxis": [{ "type": "value" }],
                "yAxis": [{ "type": "category", "data": names }],
                "series": [{
                    "name": "value",
                    "type": "bar",
                    "data": values,
                    "label": { "show": true, "position": "right" },
                }],
            }),
        }
    }

    /// Pie chart of food versus delivery spend
    pub fn spend_pie(title: &str, split: &SpendSplit) -> Self {
        Chart {
            title: title.to_string(),
            width: "1500px".to_string(),
            height: "500px".to_string(),
            options: json!({
                "title": { "text": title },
                "tooltip": { "show": true },
                "legend": {},
                "series": [{
                    "name": "pie",
                    "type": "pie",
                    "data": [
                        { "name": "Food sum", "value": split.total_food },
                        { "name": "Delivery sum", "value": split.total_delivery },
                    ],
                    "label": { "show": true, "formatter": "{b}: {c}" },
                }],
            }),
        }
    }
}

/// Page of charts
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub charts: Vec<Chart>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chart(&mut self, chart: Chart) -> &mut Self {
        self.charts.push(chart);
        self
    }

    pub fn render(&self) -> Result<String, ReportError> {
        let charts = self
            .charts
            .iter()
            .enumerate()
            .map(|(i, chart)| -> Result<ChartView, ReportError> {
                Ok(ChartView {
                    id: format!("chart{}", i),
                    width: chart.width.clone(),
                    height: chart.height.clone(),
                    options: script_safe_json(&chart.options)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut env = Environment::new();
        env.add_template("report.html", REPORT_TEMPLATE)?;
        let template = env.get_template("report.html")?;

        let html = template.render(context! {
            title => "Wolt order history",
            echarts_src => ECHARTS_CDN,
            charts => charts,
        })?;

        Ok(html)
    }

    pub async fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let html = self.render()?;
        tokio::fs::write(path, html).await?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

/// Serialize for inlining inside a `<script>` element
fn script_safe_json(value: &Value) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Run every aggregate and assemble the report page
///
/// Chart order: weekly orders, the three venue rankings, the spend split.
pub async fn build_report(
    repo: &OrderRepository,
    start: NaiveDate,
    until: NaiveDate,
) -> Result<Report, ReportError> {
    let venue_spends = repo.top_venues_by_total_spend().await?;
    let venue_orders = repo.top_venues_by_order_count().await?;
    let venue_delivery = repo.top_venues_by_delivery_spend().await?;
    let totals = repo.total_food_and_delivery_spend().await?;
    let weeks = repo.weekly_order_counts(start, until).await?;

    info!(
        "Building report: {} venues, {} weeks",
        venue_spends.len(),
        weeks.len()
    );

    let mut report = Report::new();
    report
        .add_chart(Chart::weekly_orders("Orders per week", &weeks))
        .add_chart(Chart::venue_bars("Venues by total spend", &venue_spends))
        .add_chart(Chart::venue_bars(
            "Venues by total number of orders",
            &venue_orders,
        ))
        .add_chart(Chart::venue_bars(
            "Venues by total spend on delivery",
            &venue_delivery,
        ))
        .add_chart(Chart::spend_pie("Total spends", &totals));

    Ok(report)
}
