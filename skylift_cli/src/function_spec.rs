// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Existing role referenced by the spec file; skylift never creates it.
#[derive(Debug, serde::Deserialize)]
pub struct ImportedRole {
    pub name: String,
    pub arn: String,
}

/// Existing log group referenced by the spec file.
#[derive(Debug, serde::Deserialize)]
pub struct ImportedLogGroup {
    pub name: String,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ImportedResources {
    #[serde(default)]
    pub roles: Vec<ImportedRole>,
    #[serde(default)]
    pub log_groups: Vec<ImportedLogGroup>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SpecFunction {
    pub name: String,
    pub role: String,
    pub log_group: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct FunctionSpecFile {
    #[serde(default)]
    pub imports: ImportedResources,
    pub functions: Vec<SpecFunction>,
}

impl SpecFunction {
    pub fn is_valid(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.name.is_empty(), "empty name in function");
        anyhow::ensure!(!self.role.is_empty(), "empty role in function '{}'", self.name);
        anyhow::ensure!(!self.log_group.is_empty(), "empty log group in function '{}'", self.name);
        anyhow::ensure!(
            !self.depends_on.iter().any(|dependency| dependency.is_empty()),
            "empty dependency in function '{}'",
            self.name
        );
        Ok(())
    }
}

impl FunctionSpecFile {
    pub fn is_valid(&self) -> anyhow::Result<()> {
        for role in &self.imports.roles {
            anyhow::ensure!(!role.name.is_empty(), "empty name in imported role");
            anyhow::ensure!(!role.arn.is_empty(), "empty arn in imported role '{}'", role.name);
        }
        for log_group in &self.imports.log_groups {
            anyhow::ensure!(!log_group.name.is_empty(), "empty name in imported log group");
        }
        for function in &self.functions {
            function.is_valid()?;
        }
        Ok(())
    }
}
