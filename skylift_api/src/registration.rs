// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::common::ResponseError;
use crate::resource_id::ResourceId;
use crate::resource_reference::{AttributeRef, ResourceReference};

/// Value of a declared resource property. Attribute values are resolved
/// by the provisioning engine at apply time; everything else is passed
/// through literally.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Attribute(AttributeRef),
    Map(std::collections::BTreeMap<String, String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationOptions {
    /// Resources that must be realized before this one. A pure ordering
    /// hint handed to the engine, never interpreted locally.
    pub depends_on: Vec<ResourceReference>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterResourceRequest {
    /// Logical identity the engine files this declaration under.
    pub resource_id: ResourceId,
    pub properties: std::collections::BTreeMap<String, PropertyValue>,
    pub options: RegistrationOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegisterResourceResponse {
    ResponseError(ResponseError),
    Reference(ResourceReference),
}

#[async_trait::async_trait]
pub trait ResourceRegistrationAPI: ResourceRegistrationAPIClone + Sync + Send {
    async fn register(&mut self, request: RegisterResourceRequest) -> anyhow::Result<RegisterResourceResponse>;
}

// https://stackoverflow.com/a/30353928
pub trait ResourceRegistrationAPIClone {
    fn clone_box(&self) -> Box<dyn ResourceRegistrationAPI>;
}
impl<T> ResourceRegistrationAPIClone for T
where
    T: 'static + ResourceRegistrationAPI + Clone,
{
    fn clone_box(&self) -> Box<dyn ResourceRegistrationAPI> {
        Box::new(self.clone())
    }
}
impl Clone for Box<dyn ResourceRegistrationAPI> {
    fn clone(&self) -> Box<dyn ResourceRegistrationAPI> {
        self.clone_box()
    }
}
