//! Service account and stack records exchanged with the collaborators

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stackctl_core::{
    Error, Result, IAM_SERVICE_ACCOUNT_NAME_TAG, MANAGED_BY_LABEL_KEY, MANAGED_BY_LABEL_VALUE,
    ROLE_ARN_ANNOTATION,
};
use std::fmt;
use std::str::FromStr;

/// Namespace and name identifying a service account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterIamMeta {
    pub name: String,
    pub namespace: String,
}

impl ClusterIamMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// `namespace/name`
    #[must_use]
    pub fn name_string(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    #[must_use]
    pub fn as_object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            ..ObjectMeta::default()
        }
    }
}

impl fmt::Display for ClusterIamMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for ClusterIamMeta {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [namespace, name] if !namespace.is_empty() && !name.is_empty() => {
                Ok(Self::new(*namespace, *name))
            }
            _ => Err(Error::configuration(format!(
                "unexpected serviceaccount name format {s:?}"
            ))),
        }
    }
}

/// Kubernetes object metadata, reduced to what service accounts need
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
}

/// A service account bound to an IAM role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIamServiceAccount {
    #[serde(flatten)]
    pub meta: ClusterIamMeta,
    #[serde(default)]
    pub labels: IndexMap<String, String>,
    #[serde(default)]
    pub annotations: IndexMap<String, String>,
    /// Existing role to bind instead of creating one
    #[serde(default, rename = "attachRoleARN", skip_serializing_if = "Option::is_none")]
    pub attach_role_arn: Option<String>,
    /// Create the role only, leave the Kubernetes object alone
    #[serde(default)]
    pub role_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceAccountStatus>,
}

impl ClusterIamServiceAccount {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: ClusterIamMeta::new(namespace, name),
            labels: IndexMap::new(),
            annotations: IndexMap::new(),
            attach_role_arn: None,
            role_only: false,
            status: None,
        }
    }

    #[must_use]
    pub fn name_string(&self) -> String {
        self.meta.name_string()
    }

    /// Role the service account is bound to, once known
    #[must_use]
    pub fn role_arn(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.role_arn.as_deref())
    }

    pub fn set_role_arn(&mut self, role_arn: impl Into<String>) {
        self.status
            .get_or_insert_with(ServiceAccountStatus::default)
            .role_arn = Some(role_arn.into());
    }

    /// Mark the object as managed by stackctl
    pub fn set_managed_by_label(&mut self) {
        self.labels.insert(
            MANAGED_BY_LABEL_KEY.to_string(),
            MANAGED_BY_LABEL_VALUE.to_string(),
        );
    }

    /// Copy the known role ARN into the annotations
    pub fn set_annotations(&mut self) {
        if let Some(role_arn) = self.role_arn().map(str::to_string) {
            self.annotations
                .insert(ROLE_ARN_ANNOTATION.to_string(), role_arn);
        }
    }

    #[must_use]
    pub fn as_object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            labels: self.labels.clone(),
            annotations: self.annotations.clone(),
            ..self.meta.as_object_meta()
        }
    }
}

/// The parts of a CloudFormation stack the task builders look at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSummary {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tags: IndexMap<String, String>,
}

impl StackSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// `namespace/name` of the service account this role stack was made for
    #[must_use]
    pub fn iam_service_account_name(&self) -> Option<&str> {
        self.tags
            .get(IAM_SERVICE_ACCOUNT_NAME_TAG)
            .map(String::as_str)
    }
}
