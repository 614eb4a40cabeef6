//! CloudWatch-backed metrics source.

use async_trait::async_trait;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Metric, MetricDataQuery, MetricStat};
use chrono::{Duration, Utc};

use cloudpilot_core::provider::{AlarmSummary, MetricData, MetricQuery, MetricsSource};
use cloudpilot_core::ProviderResult;

use crate::error::sdk_error;

/// Metrics source backed by the AWS CloudWatch API.
#[derive(Debug, Clone)]
pub struct AwsMetricsSource {
    client: aws_sdk_cloudwatch::Client,
}

impl AwsMetricsSource {
    /// Wrap a CloudWatch client.
    #[must_use]
    pub fn new(client: aws_sdk_cloudwatch::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for AwsMetricsSource {
    async fn metric_series(&self, query: &MetricQuery) -> ProviderResult<MetricData> {
        let end = Utc::now();
        let start = end - Duration::hours(query.window_hours);

        let metric = Metric::builder()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .build();

        let stat = MetricStat::builder()
            .metric(metric)
            .period(query.period_seconds)
            .stat(&query.stat)
            .build();

        let data_query = MetricDataQuery::builder()
            .id("q0")
            .metric_stat(stat)
            .build();

        let response = self
            .client
            .get_metric_data()
            .metric_data_queries(data_query)
            .start_time(DateTime::from_millis(start.timestamp_millis()))
            .end_time(DateTime::from_millis(end.timestamp_millis()))
            .send()
            .await
            .map_err(|e| sdk_error("cloudwatch", e))?;

        let Some(result) = response.metric_data_results().first() else {
            return Ok(MetricData::default());
        };

        Ok(MetricData {
            timestamps: result
                .timestamps()
                .iter()
                .map(ToString::to_string)
                .collect(),
            values: result.values().to_vec(),
        })
    }

    async fn alarms(&self) -> ProviderResult<Vec<AlarmSummary>> {
        let response = self
            .client
            .describe_alarms()
            .send()
            .await
            .map_err(|e| sdk_error("cloudwatch", e))?;

        Ok(response
            .metric_alarms()
            .iter()
            .map(|alarm| AlarmSummary {
                name: alarm.alarm_name().unwrap_or_default().to_owned(),
                description: alarm.alarm_description().map(ToOwned::to_owned),
                metric_name: alarm.metric_name().map(ToOwned::to_owned),
                namespace: alarm.namespace().map(ToOwned::to_owned),
                state: alarm
                    .state_value()
                    .map(|s| s.as_str().to_owned())
                    .unwrap_or_default(),
                state_reason: alarm.state_reason().map(ToOwned::to_owned),
            })
            .collect())
    }
}
