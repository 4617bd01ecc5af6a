// src/adapter/resources.rs

//! Resource Context: cluster-level attributes plus the well-known Kubernetes
//! columns of a row.

use crate::errors::ConversionError;
use crate::row::Row;
use crate::telemetry::{KeyValue, Resource};

/// Well-known row columns and the resource attribute each one maps to.
const ROW_ATTRIBUTES: [(&str, &str); 4] = [
    ("container", "k8s.container.name"),
    ("pod", "k8s.pod.name"),
    ("service", "service.name"),
    ("namespace", "k8s.namespace.name"),
];

pub const CLUSTER_NAME_ATTRIBUTE: &str = "k8s.cluster.name";
pub const CLUSTER_ID_ATTRIBUTE: &str = "px.cluster.id";
pub const INSTRUMENTATION_PROVIDER_ATTRIBUTE: &str = "instrumentation.provider";

/// Shared, read-only attribute source handed to every Row Converter.
///
/// Immutable after construction; workers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ResourceHelper {
    cluster_name: String,
    cluster_id: Option<String>,
}

impl ResourceHelper {
    pub fn new(cluster_name: impl Into<String>, cluster_id: Option<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            cluster_id: cluster_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Build the resource for one row. Recomputed per row, never cached.
    ///
    /// Well-known columns that are absent are skipped; a present column with a
    /// non-string value is a conversion error.
    pub fn create_resource(&self, row: &Row) -> Result<Resource, ConversionError> {
        let mut attributes = Vec::with_capacity(ROW_ATTRIBUTES.len() + 3);

        for (column, key) in ROW_ATTRIBUTES {
            if let Some(value) = row.opt_str(column)? {
                if !value.is_empty() {
                    attributes.push(KeyValue::string(key, value));
                }
            }
        }

        attributes.push(KeyValue::string(CLUSTER_NAME_ATTRIBUTE, &self.cluster_name));
        if let Some(ref id) = self.cluster_id {
            attributes.push(KeyValue::string(CLUSTER_ID_ATTRIBUTE, id));
        }
        attributes.push(KeyValue::string(INSTRUMENTATION_PROVIDER_ATTRIBUTE, "pixie"));

        Ok(Resource { attributes })
    }
}
