use scriptcollect::adapter::{IntegrationDescriptor, ResourceHelper, RowConverter};
use scriptcollect::errors::ConversionError;
use scriptcollect::row::Row;
use scriptcollect::telemetry::{
    Gauge, InstrumentationScope, Metric, MetricData, NumberDataPoint, NumberValue,
    ResourceMetrics, ScopeMetrics,
};

/// Column whose mere presence makes [`GaugeAdapter`] panic, standing in for
/// malformed data that trips an invalid access deep inside a converter.
pub const PANIC_COLUMN: &str = "boom";

/// Minimal metrics adapter: one gauge per row from the `value` column.
#[derive(Debug, Clone)]
pub struct GaugeAdapter {
    descriptor: IntegrationDescriptor,
}

impl GaugeAdapter {
    pub fn new(id: &str, collect_interval_sec: u64) -> Self {
        Self {
            descriptor: IntegrationDescriptor {
                id: id.to_string(),
                collect_interval_sec,
                script: format!("script for {id}"),
            },
        }
    }
}

impl RowConverter for GaugeAdapter {
    type Entity = ResourceMetrics;

    fn descriptor(&self) -> &IntegrationDescriptor {
        &self.descriptor
    }

    fn convert(
        &self,
        resources: &ResourceHelper,
        row: &Row,
    ) -> Result<Vec<ResourceMetrics>, ConversionError> {
        if row.get(PANIC_COLUMN).is_some() {
            panic!("malformed row for {}", self.descriptor.id);
        }

        let value = row.get_f64("value")?;
        Ok(vec![ResourceMetrics {
            resource: resources.create_resource(row)?,
            scope_metrics: vec![ScopeMetrics {
                scope: InstrumentationScope::default(),
                metrics: vec![Metric {
                    name: "test.gauge".to_string(),
                    description: String::new(),
                    unit: "1".to_string(),
                    data: MetricData::Gauge(Gauge {
                        data_points: vec![NumberDataPoint {
                            attributes: Vec::new(),
                            time_unix_nano: 0,
                            value: NumberValue::AsDouble(value),
                        }],
                    }),
                }],
            }],
        }])
    }
}
