// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use skylift_api::function::{FunctionFactory, FunctionResource, FunctionSpec};
use skylift_api::resource_reference::{LogGroupReference, ResourceReference, RoleReference};

pub mod function_spec;

/// Starter spec file written by `--template`.
pub fn function_spec_template() -> String {
    String::from(
        r##"{
    "imports": {
        "roles": [
            { "name": "worker-role", "arn": "arn:aws:iam::123456789012:role/worker" }
        ],
        "log_groups": [
            { "name": "worker-logs" }
        ]
    },
    "functions": [
        {
            "name": "checkout-worker",
            "role": "worker-role",
            "log_group": "worker-logs",
            "depends_on": []
        }
    ]
}
"##,
    )
}

/// Declare every function in the spec file, in file order, and return
/// the declared resources.
///
/// `depends_on` entries may name imported resources or functions that
/// appear earlier in the file; anything else is an error.
pub async fn declare_functions(
    spec_file: function_spec::FunctionSpecFile,
    factory: &mut FunctionFactory,
) -> anyhow::Result<Vec<FunctionResource>> {
    spec_file.is_valid()?;

    let mut roles = std::collections::HashMap::new();
    for role in &spec_file.imports.roles {
        roles.insert(role.name.clone(), RoleReference::imported(&role.name, &role.arn));
    }
    let mut log_groups = std::collections::HashMap::new();
    for log_group in &spec_file.imports.log_groups {
        log_groups.insert(log_group.name.clone(), LogGroupReference::imported(&log_group.name));
    }

    let mut referable: std::collections::HashMap<String, ResourceReference> = std::collections::HashMap::new();
    for (name, role) in &roles {
        referable.insert(name.clone(), role.reference().clone());
    }
    for (name, log_group) in &log_groups {
        referable.insert(name.clone(), log_group.reference().clone());
    }

    let mut resources = vec![];
    for function in &spec_file.functions {
        let role = roles
            .get(&function.role)
            .ok_or_else(|| anyhow::anyhow!("unknown role '{}' in function '{}'", function.role, function.name))?;
        let log_group = log_groups
            .get(&function.log_group)
            .ok_or_else(|| anyhow::anyhow!("unknown log group '{}' in function '{}'", function.log_group, function.name))?;

        let mut depends_on = vec![];
        for dependency in &function.depends_on {
            depends_on.push(
                referable
                    .get(dependency)
                    .ok_or_else(|| anyhow::anyhow!("unknown dependency '{}' in function '{}'", dependency, function.name))?
                    .clone(),
            );
        }

        let resource = factory
            .create(FunctionSpec {
                name: function.name.clone(),
                log_group: log_group.clone(),
                role: role.clone(),
                depends_on,
            })
            .await?;
        referable.insert(function.name.clone(), resource.reference.clone());
        resources.push(resource);
    }

    Ok(resources)
}
