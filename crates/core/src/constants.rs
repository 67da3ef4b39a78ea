/// Constants used throughout the stackctl codebase
// Environment variable names
pub const STACKCTL_LOG_VAR: &str = "STACKCTL_LOG";
pub const STACKCTL_TASK_TIMEOUT_VAR: &str = "STACKCTL_TASK_TIMEOUT";
pub const STACKCTL_SEQUENTIAL_POLICY_VAR: &str = "STACKCTL_SEQUENTIAL_POLICY";
pub const STACKCTL_PLAN_VAR: &str = "STACKCTL_PLAN";

// Default log filter when neither STACKCTL_LOG nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info";

// Labels applied to Kubernetes objects created by stackctl
pub const MANAGED_BY_LABEL_KEY: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY_LABEL_VALUE: &str = "stackctl";

// Annotation carrying the IAM role bound to a service account
pub const ROLE_ARN_ANNOTATION: &str = "eks.amazonaws.com/role-arn";

// Stack tag naming the service account ("namespace/name") a role stack belongs to
pub const IAM_SERVICE_ACCOUNT_NAME_TAG: &str = "stackctl.io/iamserviceaccount-name";
