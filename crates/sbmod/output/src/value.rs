//! Output values

use sbmod_reconcile::PlanAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A provisioned resource as it appears in a map output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedResource {
    pub id: String,
    pub name: String,
    /// Plan action for this resource in the pass that produced the output
    pub action: Option<PlanAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OutputValue {
    Scalar(String),
    Map(BTreeMap<String, ProjectedResource>),
}

impl OutputValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            OutputValue::Scalar(s) => Some(s.as_str()),
            OutputValue::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ProjectedResource>> {
        match self {
            OutputValue::Map(map) => Some(map),
            OutputValue::Scalar(_) => None,
        }
    }

    /// Resource by full key, or by bare name when exactly one composite key
    /// (`parent/name`) ends in it
    pub fn resource(&self, name: &str) -> Option<&ProjectedResource> {
        let map = self.as_map()?;
        if let Some(resource) = map.get(name) {
            return Some(resource);
        }

        let suffix = format!("/{}", name);
        let mut matches = map
            .iter()
            .filter(|(key, _)| key.ends_with(&suffix))
            .map(|(_, resource)| resource);
        match (matches.next(), matches.next()) {
            (Some(resource), None) => Some(resource),
            _ => None,
        }
    }
}

impl From<String> for OutputValue {
    fn from(value: String) -> Self {
        OutputValue::Scalar(value)
    }
}
