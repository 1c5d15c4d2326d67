// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-License-Identifier: MIT

use skylift_api::registration::{PropertyValue, RegisterResourceRequest, RegisterResourceResponse, ResourceRegistrationAPI};
use skylift_api::resource_id::ResourceId;
use skylift_api::resource_reference::ResourceReference;

/// One declaration filed with the engine.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResourceDeclaration {
    pub handle_id: uuid::Uuid,
    pub resource_id: ResourceId,
    pub properties: std::collections::BTreeMap<String, PropertyValue>,
    pub depends_on: Vec<ResourceId>,
}

/// The document handed off to the external provisioning engine,
/// listing declarations in registration order.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ProvisioningPlan {
    pub resources: Vec<ResourceDeclaration>,
}

impl ProvisioningPlan {
    pub fn render(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

/// In-process stand-in for the engine's registration endpoint: mints
/// handles and records declarations, leaving reconciliation to the
/// engine that consumes the rendered plan.
#[derive(Clone)]
pub struct PlanRecorder {
    inner: std::sync::Arc<tokio::sync::Mutex<PlanRecorderInner>>,
}

struct PlanRecorderInner {
    declarations: Vec<ResourceDeclaration>,
}

impl PlanRecorder {
    pub fn new() -> Self {
        Self {
            inner: std::sync::Arc::new(tokio::sync::Mutex::new(PlanRecorderInner { declarations: vec![] })),
        }
    }

    pub async fn plan(&self) -> ProvisioningPlan {
        ProvisioningPlan {
            resources: self.inner.lock().await.declarations.clone(),
        }
    }
}

impl Default for PlanRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ResourceRegistrationAPI for PlanRecorder {
    async fn register(&mut self, request: RegisterResourceRequest) -> anyhow::Result<RegisterResourceResponse> {
        let mut lck = self.inner.lock().await;

        if lck.declarations.iter().any(|declaration| declaration.resource_id == request.resource_id) {
            return Ok(RegisterResourceResponse::ResponseError(skylift_api::common::ResponseError {
                summary: "duplicate logical name".to_string(),
                detail: Some(request.resource_id.to_string()),
            }));
        }

        // Literal properties become the handle's exported attributes;
        // attribute values are only resolved by the engine at apply time.
        let attributes = request
            .properties
            .iter()
            .filter_map(|(name, value)| match value {
                PropertyValue::String(value) => Some((name.clone(), value.clone())),
                _ => None,
            })
            .collect();
        let reference = ResourceReference::new(request.resource_id.clone(), attributes);

        log::info!("recorded declaration of '{}'", request.resource_id);
        lck.declarations.push(ResourceDeclaration {
            handle_id: uuid::Uuid::new_v4(),
            resource_id: request.resource_id,
            properties: request.properties,
            depends_on: request
                .options
                .depends_on
                .iter()
                .map(|dependency| dependency.resource_id().clone())
                .collect(),
        });

        Ok(RegisterResourceResponse::Reference(reference))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use skylift_api::function::{FunctionFactory, FunctionSpec, IMAGE_URI_PENDING};
    use skylift_api::registration::RegistrationOptions;
    use skylift_api::resource_id::PROVIDER_AWS;
    use skylift_api::resource_reference::{AttributeRef, LogGroupReference, RoleReference, ATTRIBUTE_ARN, ROLE_TYPE};

    fn test_request(name: &str, depends_on: Vec<ResourceReference>) -> RegisterResourceRequest {
        RegisterResourceRequest {
            resource_id: ResourceId::new(PROVIDER_AWS, "function", name),
            properties: std::collections::BTreeMap::from([("name".to_string(), PropertyValue::String(name.to_string()))]),
            options: RegistrationOptions { depends_on },
        }
    }

    #[tokio::test]
    async fn test_recorder_keeps_registration_order() {
        let mut recorder = PlanRecorder::new();

        for name in ["first", "second", "third"] {
            match recorder.register(test_request(name, vec![])).await.unwrap() {
                RegisterResourceResponse::Reference(reference) => {
                    assert_eq!(name, reference.resource_id().name);
                    assert_eq!(Some(name), reference.attribute_value("name"));
                }
                RegisterResourceResponse::ResponseError(err) => panic!("registration rejected: {}", err),
            }
        }

        let plan = recorder.plan().await;
        assert_eq!(
            vec!["first", "second", "third"],
            plan.resources.iter().map(|declaration| declaration.resource_id.name.as_str()).collect::<Vec<_>>()
        );

        let mut handles = plan.resources.iter().map(|declaration| declaration.handle_id).collect::<Vec<_>>();
        handles.sort();
        handles.dedup();
        assert_eq!(3, handles.len());
    }

    #[tokio::test]
    async fn test_recorder_rejects_duplicate_names() {
        let mut recorder = PlanRecorder::new();

        let first = test_request("checkout-worker", vec![]);
        assert!(matches!(
            recorder.register(first).await.unwrap(),
            RegisterResourceResponse::Reference(_)
        ));

        let mut second = test_request("checkout-worker", vec![]);
        second
            .properties
            .insert("name".to_string(), PropertyValue::String("overwritten".to_string()));
        match recorder.register(second).await.unwrap() {
            RegisterResourceResponse::ResponseError(err) => {
                assert_eq!("duplicate logical name", err.summary);
                assert_eq!(Some("aws:function:checkout-worker".to_string()), err.detail);
            }
            RegisterResourceResponse::Reference(_) => panic!("duplicate registration accepted"),
        }

        // the first declaration is the one kept
        let plan = recorder.plan().await;
        assert_eq!(1, plan.resources.len());
        assert_eq!(
            Some(&PropertyValue::String("checkout-worker".to_string())),
            plan.resources[0].properties.get("name")
        );
    }

    #[tokio::test]
    async fn test_plan_round_trips_through_json() {
        let mut recorder = PlanRecorder::new();

        let queue = match recorder
            .register(RegisterResourceRequest {
                resource_id: ResourceId::new(PROVIDER_AWS, "queue", "orders"),
                properties: std::collections::BTreeMap::from([("name".to_string(), PropertyValue::String("orders".to_string()))]),
                options: RegistrationOptions::default(),
            })
            .await
            .unwrap()
        {
            RegisterResourceResponse::Reference(reference) => reference,
            RegisterResourceResponse::ResponseError(err) => panic!("registration rejected: {}", err),
        };

        let mut consumer = test_request("consumer", vec![queue]);
        consumer.properties.insert(
            "role".to_string(),
            PropertyValue::Attribute(AttributeRef {
                resource: ResourceId::new(PROVIDER_AWS, ROLE_TYPE, "worker-role"),
                attribute: ATTRIBUTE_ARN.to_string(),
            }),
        );
        consumer.properties.insert(
            "tags".to_string(),
            PropertyValue::Map(std::collections::BTreeMap::from([("env".to_string(), "production".to_string())])),
        );
        recorder.register(consumer).await.unwrap();

        let plan = recorder.plan().await;
        let rendered = plan.render().unwrap();
        let parsed: ProvisioningPlan = serde_json::from_str(&rendered).unwrap();
        assert_eq!(plan, parsed);
        assert_eq!(vec![ResourceId::new(PROVIDER_AWS, "queue", "orders")], parsed.resources[1].depends_on);
    }

    #[tokio::test]
    async fn test_factory_backed_by_recorder() {
        let recorder = PlanRecorder::new();
        let mut factory = FunctionFactory::new(Box::new(recorder.clone()));

        let role = RoleReference::imported("worker-role", "arn:aws:iam::123456789012:role/worker");
        let resource = factory
            .create(FunctionSpec {
                name: "checkout-worker".to_string(),
                log_group: LogGroupReference::imported("checkout-logs"),
                role: role.clone(),
                depends_on: vec![],
            })
            .await
            .unwrap();
        assert_eq!("aws:function:checkout-worker", resource.reference.resource_id().to_string());

        let plan = recorder.plan().await;
        assert_eq!(1, plan.resources.len());
        let declaration = &plan.resources[0];
        assert_eq!("aws:function:checkout-worker", declaration.resource_id.to_string());
        assert_eq!(Some(&PropertyValue::String("Image".to_string())), declaration.properties.get("package_type"));
        assert_eq!(
            Some(&PropertyValue::String(IMAGE_URI_PENDING.to_string())),
            declaration.properties.get("image_uri")
        );
        assert_eq!(Some(&PropertyValue::Attribute(role.arn())), declaration.properties.get("role"));
        assert!(declaration.depends_on.is_empty());
        assert!(!declaration.properties.contains_key("log_group"));
    }
}
