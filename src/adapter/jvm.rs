// src/adapter/jvm.rs

//! JVM garbage-collection and heap statistics, one gauge per column.

use crate::errors::ConversionError;
use crate::row::Row;
use crate::telemetry::{
    instrumentation_scope, Gauge, KeyValue, Metric, MetricData, NumberDataPoint, NumberValue,
    ResourceMetrics, ScopeMetrics,
};

use super::{IntegrationDescriptor, ResourceHelper, RowConverter};

pub const ADAPTER_NAME: &str = "jvm";

const SCRIPT_TEMPLATE: &str = r#"#px:set max_output_rows_per_table=10000

import px

df = px.DataFrame('jvm_stats', start_time='-{interval}s')
df.container = df.ctx['container_name']
df.pod = df.ctx['pod']
df.service = df.ctx['service']
df.namespace = df.ctx['namespace']
df.used_heap_size = px.Bytes(df.used_heap_size)
df.total_heap_size = px.Bytes(df.total_heap_size)
df.max_heap_size = px.Bytes(df.max_heap_size)

per_process = df.groupby(['upid', 'container', 'pod', 'service', 'namespace']).agg(
    young_gc_time_max=('young_gc_time', px.max),
    young_gc_time_min=('young_gc_time', px.min),
    full_gc_time_max=('full_gc_time', px.max),
    full_gc_time_min=('full_gc_time', px.min),
    used_heap_size=('used_heap_size', px.mean),
    total_heap_size=('total_heap_size', px.mean),
    max_heap_size=('max_heap_size', px.mean),
    timestamp=('time_', px.max),
)
per_process.young_gc_time = per_process.young_gc_time_max - per_process.young_gc_time_min
per_process.full_gc_time = per_process.full_gc_time_max - per_process.full_gc_time_min

per_workload = per_process.groupby(['container', 'pod', 'service', 'namespace']).agg(
    young_gc_time=('young_gc_time', px.sum),
    full_gc_time=('full_gc_time', px.sum),
    used_heap_size=('used_heap_size', px.sum),
    total_heap_size=('total_heap_size', px.sum),
    max_heap_size=('max_heap_size', px.sum),
    timestamp=('timestamp', px.max),
)
per_workload.young_gc_time = px.DurationNanos(per_workload.young_gc_time) / 1000000.0
per_workload.full_gc_time = px.DurationNanos(per_workload.full_gc_time) / 1000000.0
per_workload['time_'] = per_workload['timestamp']

px.display(per_workload, 'jvm')
"#;

/// Render the default script for a collection window of `interval` seconds.
pub fn script(interval: u64) -> String {
    SCRIPT_TEMPLATE.replace("{interval}", &interval.to_string())
}

struct MetricDef {
    column: &'static str,
    name: &'static str,
    unit: &'static str,
    attributes: &'static [(&'static str, &'static str)],
}

const METRICS: [MetricDef; 5] = [
    MetricDef {
        column: "young_gc_time",
        name: "runtime.jvm.gc.collection",
        unit: "ms",
        attributes: &[("gc", "young")],
    },
    MetricDef {
        column: "full_gc_time",
        name: "runtime.jvm.gc.collection",
        unit: "ms",
        attributes: &[("gc", "full")],
    },
    MetricDef {
        column: "used_heap_size",
        name: "runtime.jvm.memory.area",
        unit: "bytes",
        attributes: &[("type", "used"), ("area", "heap")],
    },
    MetricDef {
        column: "total_heap_size",
        name: "runtime.jvm.memory.area",
        unit: "bytes",
        attributes: &[("type", "total"), ("area", "heap")],
    },
    MetricDef {
        column: "max_heap_size",
        name: "runtime.jvm.memory.area",
        unit: "bytes",
        attributes: &[("type", "max"), ("area", "heap")],
    },
];

/// Columns every JVM row must carry besides `time_`.
pub fn metric_columns() -> impl Iterator<Item = &'static str> {
    METRICS.iter().map(|def| def.column)
}

#[derive(Debug, Clone)]
pub struct JvmAdapter {
    descriptor: IntegrationDescriptor,
}

impl JvmAdapter {
    pub fn new(descriptor: IntegrationDescriptor) -> Self {
        Self { descriptor }
    }
}

impl RowConverter for JvmAdapter {
    type Entity = ResourceMetrics;

    fn descriptor(&self) -> &IntegrationDescriptor {
        &self.descriptor
    }

    fn convert(
        &self,
        resources: &ResourceHelper,
        row: &Row,
    ) -> Result<Vec<ResourceMetrics>, ConversionError> {
        let timestamp = row.get_time_ns("time_")?;
        let resource = resources.create_resource(row)?;

        let mut metrics = Vec::with_capacity(METRICS.len());
        for def in METRICS.iter() {
            let value = row.get_f64(def.column)?;
            metrics.push(Metric {
                name: def.name.to_string(),
                description: String::new(),
                unit: def.unit.to_string(),
                data: MetricData::Gauge(Gauge {
                    data_points: vec![NumberDataPoint {
                        attributes: def
                            .attributes
                            .iter()
                            .map(|(k, v)| KeyValue::string(*k, *v))
                            .collect(),
                        time_unix_nano: timestamp,
                        value: NumberValue::AsDouble(value),
                    }],
                }),
            });
        }

        Ok(vec![ResourceMetrics {
            resource,
            scope_metrics: vec![ScopeMetrics {
                scope: instrumentation_scope(),
                metrics,
            }],
        }])
    }
}
