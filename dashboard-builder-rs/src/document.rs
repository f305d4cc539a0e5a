// dashboard-builder-rs/src/document.rs
// Declarative dashboard document and the panels the pipeline ships with

use serde::{Deserialize, Serialize};
use shared_types_rs::PipelineConfig;

pub const STEP_FUNCTIONS_NAMESPACE: &str = "AWS/StepFunctions";
pub const LAMBDA_NAMESPACE: &str = "AWS/Lambda";

/// What the dashboard is scoped to.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSpec {
    pub dashboard_name: String,
    pub region: String,
    pub state_machine_arn: String,
    pub function_names: Vec<String>,
    pub period_secs: u32,
}

impl DashboardSpec {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            dashboard_name: config.monitoring.dashboard_name.clone(),
            region: config.system.region.clone(),
            state_machine_arn: config.monitoring.state_machine_arn.clone(),
            function_names: config.monitoring.function_names.clone(),
            period_secs: config.monitoring.period_secs,
        }
    }

    /// Console link for the published dashboard
    pub fn console_url(&self) -> String {
        format!(
            "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#dashboards:name={name}",
            region = self.region,
            name = self.dashboard_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardBody {
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub properties: WidgetProperties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetProperties {
    pub metrics: Vec<MetricSeries>,
    pub view: ViewKind,
    pub stacked: bool,
    pub region: String,
    pub title: String,
    pub period: u32,
    pub stat: Statistic,
}

/// `[namespace, metric name, dimension key, dimension value]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSeries(pub String, pub String, pub String, pub String);

impl MetricSeries {
    pub fn new(namespace: &str, metric: &str, dimension_key: &str, dimension_value: &str) -> Self {
        Self(
            namespace.to_string(),
            metric.to_string(),
            dimension_key.to_string(),
            dimension_value.to_string(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewKind {
    #[serde(rename = "timeSeries")]
    TimeSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Sum,
    Average,
}

struct Placement {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

fn panel(spec: &DashboardSpec, at: Placement, title: &str, stat: Statistic, metrics: Vec<MetricSeries>) -> Widget {
    Widget {
        kind: WidgetKind::Metric,
        x: at.x,
        y: at.y,
        width: at.width,
        height: at.height,
        properties: WidgetProperties {
            metrics,
            view: ViewKind::TimeSeries,
            stacked: false,
            region: spec.region.clone(),
            title: title.to_string(),
            period: spec.period_secs,
            stat,
        },
    }
}

fn execution_series(spec: &DashboardSpec, metrics: &[&str]) -> Vec<MetricSeries> {
    metrics
        .iter()
        .map(|metric| {
            MetricSeries::new(STEP_FUNCTIONS_NAMESPACE, metric, "StateMachineArn", &spec.state_machine_arn)
        })
        .collect()
}

fn function_series(spec: &DashboardSpec, metric: &str) -> Vec<MetricSeries> {
    spec.function_names
        .iter()
        .map(|name| MetricSeries::new(LAMBDA_NAMESPACE, metric, "FunctionName", name))
        .collect()
}

/// The five pipeline panels on a 24-column grid.
pub fn build_dashboard(spec: &DashboardSpec) -> DashboardBody {
    let widgets = vec![
        panel(
            spec,
            Placement { x: 0, y: 0, width: 12, height: 6 },
            "Pipeline Execution Status",
            Statistic::Sum,
            execution_series(
                spec,
                &[
                    "ExecutionsSucceeded",
                    "ExecutionsFailed",
                    "ExecutionsAborted",
                    "ExecutionsTimedOut",
                ],
            ),
        ),
        panel(
            spec,
            Placement { x: 12, y: 0, width: 12, height: 6 },
            "Pipeline Execution Time",
            Statistic::Average,
            execution_series(spec, &["ExecutionTime"]),
        ),
        panel(
            spec,
            Placement { x: 0, y: 6, width: 24, height: 6 },
            "Lambda Function Performance (Duration)",
            Statistic::Average,
            function_series(spec, "Duration"),
        ),
        panel(
            spec,
            Placement { x: 0, y: 12, width: 12, height: 6 },
            "Lambda Invocations",
            Statistic::Sum,
            function_series(spec, "Invocations"),
        ),
        panel(
            spec,
            Placement { x: 12, y: 12, width: 12, height: 6 },
            "Lambda Errors",
            Statistic::Sum,
            function_series(spec, "Errors"),
        ),
    ];

    DashboardBody { widgets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> DashboardSpec {
        DashboardSpec {
            dashboard_name: "AIPipelineDashboard".into(),
            region: "us-east-2".into(),
            state_machine_arn: "arn:aws:states:us-east-2:1:stateMachine:AIPipeline".into(),
            function_names: vec!["analyzer".into(), "enhancer".into()],
            period_secs: 300,
        }
    }

    #[test]
    fn test_panel_layout() {
        let body = build_dashboard(&spec());
        let titles: Vec<&str> = body.widgets.iter().map(|w| w.properties.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Pipeline Execution Status",
                "Pipeline Execution Time",
                "Lambda Function Performance (Duration)",
                "Lambda Invocations",
                "Lambda Errors",
            ]
        );
        assert_eq!(body.widgets[2].width, 24);
        assert_eq!((body.widgets[4].x, body.widgets[4].y), (12, 12));
    }

    #[test]
    fn test_series_scoping() {
        let body = build_dashboard(&spec());
        assert_eq!(body.widgets[0].properties.metrics.len(), 4);
        assert!(body.widgets[0]
            .properties
            .metrics
            .iter()
            .all(|m| m.0 == STEP_FUNCTIONS_NAMESPACE && m.3.ends_with("AIPipeline")));

        let errors = &body.widgets[4].properties.metrics;
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1], MetricSeries::new(LAMBDA_NAMESPACE, "Errors", "FunctionName", "enhancer"));
    }

    #[test]
    fn test_widget_json_shape() {
        let body = build_dashboard(&spec());
        let value = serde_json::to_value(&body.widgets[1]).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "metric",
                "x": 12,
                "y": 0,
                "width": 12,
                "height": 6,
                "properties": {
                    "metrics": [[
                        "AWS/StepFunctions",
                        "ExecutionTime",
                        "StateMachineArn",
                        "arn:aws:states:us-east-2:1:stateMachine:AIPipeline"
                    ]],
                    "view": "timeSeries",
                    "stacked": false,
                    "region": "us-east-2",
                    "title": "Pipeline Execution Time",
                    "period": 300,
                    "stat": "Average"
                }
            })
        );
    }

    #[test]
    fn test_console_url() {
        assert_eq!(
            spec().console_url(),
            "https://us-east-2.console.aws.amazon.com/cloudwatch/home?region=us-east-2#dashboards:name=AIPipelineDashboard"
        );
    }

    #[test]
    fn test_spec_from_default_config() {
        let spec = DashboardSpec::from_config(&PipelineConfig::default());
        assert_eq!(spec.function_names.len(), 4);
        assert_eq!(build_dashboard(&spec).widgets[3].properties.metrics.len(), 4);
    }
}
