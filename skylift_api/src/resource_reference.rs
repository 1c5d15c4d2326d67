// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::resource_id::{ResourceId, PROVIDER_AWS};

pub const ROLE_TYPE: &str = "iam_role";
pub const LOG_GROUP_TYPE: &str = "log_group";
pub const ATTRIBUTE_ARN: &str = "arn";

/// An attribute of an engine-managed resource, read by the engine at
/// apply time rather than copied by value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeRef {
    pub resource: ResourceId,
    pub attribute: String,
}

#[derive(Debug, PartialEq)]
struct ReferenceInner {
    resource_id: ResourceId,
    attributes: std::collections::BTreeMap<String, String>,
}

/// Opaque handle to a resource managed by the provisioning engine.
///
/// Clones are cheap and point at the same referent, so a reference can
/// be threaded through specs and ordering options without copying any
/// resource state. Serializes as the referent's id.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceReference {
    inner: std::sync::Arc<ReferenceInner>,
}

impl ResourceReference {
    pub fn new(resource_id: ResourceId, attributes: std::collections::BTreeMap<String, String>) -> Self {
        Self {
            inner: std::sync::Arc::new(ReferenceInner { resource_id, attributes }),
        }
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.inner.resource_id
    }

    /// Attribute of the referent, to be resolved at apply time.
    pub fn attribute(&self, attribute: &str) -> AttributeRef {
        AttributeRef {
            resource: self.inner.resource_id.clone(),
            attribute: attribute.to_string(),
        }
    }

    /// Exported attribute value, if the referent declared one.
    pub fn attribute_value(&self, attribute: &str) -> Option<&str> {
        self.inner.attributes.get(attribute).map(|value| value.as_str())
    }

    /// True if both handles point at the same referent. This is an
    /// identity comparison: two references imported separately under
    /// the same id compare equal by value but not by referent.
    pub fn same_referent(&self, other: &Self) -> bool {
        std::sync::Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl serde::Serialize for ResourceReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self.resource_id())
    }
}

/// Reference to an externally owned identity/permissions resource.
///
/// Held, never owned: skylift reads the access-control identifier and
/// never creates, changes or destroys the role itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleReference {
    reference: ResourceReference,
}

impl RoleReference {
    /// Reference an existing role by name and access-control identifier.
    pub fn imported(name: &str, arn: &str) -> Self {
        Self {
            reference: ResourceReference::new(
                ResourceId::new(PROVIDER_AWS, ROLE_TYPE, name),
                std::collections::BTreeMap::from([(ATTRIBUTE_ARN.to_string(), arn.to_string())]),
            ),
        }
    }

    /// The role's access-control identifier, resolved at apply time.
    pub fn arn(&self) -> AttributeRef {
        self.reference.attribute(ATTRIBUTE_ARN)
    }

    pub fn reference(&self) -> &ResourceReference {
        &self.reference
    }

    pub fn same_referent(&self, other: &Self) -> bool {
        self.reference.same_referent(&other.reference)
    }
}

/// Reference to an externally owned logging-destination resource.
#[derive(Debug, Clone, PartialEq)]
pub struct LogGroupReference {
    reference: ResourceReference,
}

impl LogGroupReference {
    /// Reference an existing log group by name.
    pub fn imported(name: &str) -> Self {
        Self {
            reference: ResourceReference::new(ResourceId::new(PROVIDER_AWS, LOG_GROUP_TYPE, name), std::collections::BTreeMap::new()),
        }
    }

    pub fn reference(&self) -> &ResourceReference {
        &self.reference
    }
}
