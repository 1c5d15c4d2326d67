// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use std::str::FromStr;

pub const PROVIDER_AWS: &str = "aws";

/// Identity of an engine-managed cloud resource, unique within a plan.
///
/// Rendered as `provider:type:name`, which is also the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    pub provider: String,
    pub resource_type: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(provider: &str, resource_type: &str, name: &str) -> Self {
        Self {
            provider: provider.to_string(),
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.provider, self.resource_type, self.name)
    }
}

impl FromStr for ResourceId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut tokens = s.splitn(3, ':');
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(provider), Some(resource_type), Some(name)) if !provider.is_empty() && !resource_type.is_empty() && !name.is_empty() => {
                Ok(Self::new(provider, resource_type, name))
            }
            _ => Err(anyhow::anyhow!("invalid resource id: '{}'", s)),
        }
    }
}

impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
