//! Metrics and health handlers.

use chrono::Utc;

use cloudpilot_core::provider::MetricQuery;
use cloudpilot_http::body::ApiBody;
use cloudpilot_http::response::ok_json;
use cloudpilot_model::output::{
    AlarmsResponse, HealthMetrics, HealthNumbers, InsightsResponse, LabeledSeries,
    MetricsResponse, PerformanceSummary, ServiceHealth, ServiceHealthResponse,
};
use cloudpilot_model::ApiResult;

use crate::handler::CloudPilot;

/// Trailing window for all dashboard queries, in hours.
const DASHBOARD_WINDOW_HOURS: i64 = 24;

/// CPU utilization above this is flagged as an anomaly.
const HIGH_CPU_THRESHOLD: f64 = 80.0;

/// CPU utilization below this earns a downsizing recommendation.
const LOW_CPU_THRESHOLD: f64 = 20.0;

impl CloudPilot {
    /// `GET /cloudwatch/get_metrics`
    pub(crate) async fn get_metrics(&self) -> ApiResult<http::Response<ApiBody>> {
        let cpu = self
            .metrics
            .metric_series(&query("AWS/EC2", "CPUUtilization", 300, "Average"))
            .await?;
        let bucket_size = self
            .metrics
            .metric_series(&query("AWS/S3", "BucketSizeBytes", 86_400, "Average"))
            .await?;
        let requests = self
            .metrics
            .metric_series(&query("AWS/CloudFront", "Requests", 300, "Sum"))
            .await?;

        Ok(ok_json(&MetricsResponse {
            ec2_metrics: vec![LabeledSeries::new("CPU Utilization", cpu)],
            s3_metrics: vec![LabeledSeries::new("Bucket Size", bucket_size)],
            cloudfront_metrics: vec![LabeledSeries::new("Requests", requests)],
        }))
    }

    /// `GET /cloudwatch/get_alarms`
    pub(crate) async fn get_alarms(&self) -> ApiResult<http::Response<ApiBody>> {
        let alarms = self.metrics.alarms().await?;
        Ok(ok_json(&AlarmsResponse { alarms }))
    }

    /// `GET /cloudwatch/get_service_health`
    ///
    /// A static healthy snapshot with a fresh timestamp; the console renders
    /// it as a status card.
    pub(crate) fn get_service_health(&self) -> ApiResult<http::Response<ApiBody>> {
        let now = Utc::now().to_rfc3339();
        let healthy = |availability: f64, latency: f64, errors: f64| ServiceHealth {
            status: "healthy".to_owned(),
            last_updated: now.clone(),
            metrics: HealthNumbers {
                availability,
                latency,
                errors,
            },
        };

        Ok(ok_json(&ServiceHealthResponse {
            health_metrics: HealthMetrics {
                ec2: healthy(99.99, 45.0, 0.01),
                s3: healthy(99.99, 12.0, 0.00),
                cloudfront: healthy(99.99, 35.0, 0.02),
            },
        }))
    }

    /// `GET /cloudwatch/get_insights`
    pub(crate) async fn get_insights(&self) -> ApiResult<http::Response<ApiBody>> {
        let cpu = self
            .metrics
            .metric_series(&query("AWS/EC2", "CPUUtilization", 300, "Average"))
            .await?;
        let network = self
            .metrics
            .metric_series(&query("AWS/EC2", "NetworkIn", 300, "Sum"))
            .await?;

        Ok(ok_json(&compute_insights(&cpu.values, &network.values)))
    }
}

/// Build a dashboard metric query.
fn query(namespace: &str, metric_name: &str, period_seconds: i32, stat: &str) -> MetricQuery {
    MetricQuery {
        namespace: namespace.to_owned(),
        metric_name: metric_name.to_owned(),
        period_seconds,
        stat: stat.to_owned(),
        window_hours: DASHBOARD_WINDOW_HOURS,
    }
}

/// Derive utilization insights from CPU and network series.
#[must_use]
pub fn compute_insights(cpu: &[f64], network: &[f64]) -> InsightsResponse {
    #[allow(clippy::cast_precision_loss)]
    let avg_cpu = if cpu.is_empty() {
        0.0
    } else {
        cpu.iter().sum::<f64>() / cpu.len() as f64
    };
    let max_cpu = cpu.iter().copied().fold(0.0_f64, f64::max);
    let total_network = network.iter().sum();

    let mut anomalies = Vec::new();
    let mut recommendations = Vec::new();
    if avg_cpu > HIGH_CPU_THRESHOLD {
        anomalies.push("High CPU utilization detected".to_owned());
        recommendations.push("Consider scaling up EC2 instances".to_owned());
    } else if avg_cpu < LOW_CPU_THRESHOLD {
        recommendations.push("Consider downsizing EC2 instances to optimize costs".to_owned());
    }

    InsightsResponse {
        performance_summary: PerformanceSummary {
            avg_cpu,
            max_cpu,
            total_network,
        },
        anomalies,
        recommendations,
    }
}
