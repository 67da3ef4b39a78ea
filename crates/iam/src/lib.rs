//! IAM service account tasks for stackctl
//!
//! Builds task trees that create or delete a role stack plus the matching
//! Kubernetes service account for each requested account. The stack manager
//! and the Kubernetes client are injected through [`StackManager`] and
//! [`ClientSetGetter`].

pub mod actions;
pub mod builders;
pub mod clients;
pub mod model;
pub mod tasks;

pub use actions::IamServiceAccountManager;
pub use builders::{
    new_tasks_to_create_iam_service_accounts, new_tasks_to_delete_iam_service_accounts,
    service_accounts_with_stacks,
};
pub use clients::{ClientSetGetter, KubernetesClient, StackManager};
pub use model::{
    ClusterIamMeta, ClusterIamServiceAccount, ObjectMeta, ServiceAccountStatus, StackSummary,
};
pub use tasks::{AsyncStackTask, IamServiceAccountStackTask, KubernetesTask, StackTask};
