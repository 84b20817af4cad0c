//! Deploy request options and the result of `checkDeployStatus`.

use crate::types::AsyncStatus;

/// The `<DeployOptions>` of a deploy request. Each flag is sent as the element
/// of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    pub allow_missing_files: bool,
    pub auto_update_package: bool,
    /// Validate only; nothing is saved.
    pub check_only: bool,
    pub ignore_warnings: bool,
    /// Hard delete removed components instead of using the recycle bin.
    pub purge_on_delete: bool,
    pub rollback_on_error: bool,
    pub run_all_tests: bool,
    /// The zip holds one package with `package.xml` at its root.
    pub single_package: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            allow_missing_files: false,
            auto_update_package: false,
            check_only: false,
            ignore_warnings: false,
            purge_on_delete: false,
            rollback_on_error: false,
            run_all_tests: false,
            single_package: true,
        }
    }
}

impl DeployOptions {
    /// Element order follows the Metadata API WSDL.
    pub(crate) fn to_xml(&self) -> String {
        [
            ("allowMissingFiles", self.allow_missing_files),
            ("autoUpdatePackage", self.auto_update_package),
            ("checkOnly", self.check_only),
            ("ignoreWarnings", self.ignore_warnings),
            ("purgeOnDelete", self.purge_on_delete),
            ("rollbackOnError", self.rollback_on_error),
            ("runAllTests", self.run_all_tests),
            ("singlePackage", self.single_package),
        ]
        .iter()
        .map(|(tag, on)| format!("<{tag}>{on}</{tag}>"))
        .collect()
    }
}

/// `checkDeployStatus` result, with details when they were requested.
///
/// A finished deploy that failed is still a `DeployResult`: inspect
/// `success` and the failure lists.
#[derive(Debug, Clone, Default)]
pub struct DeployResult {
    pub id: String,
    pub done: bool,
    pub status: AsyncStatus,
    pub success: bool,
    /// Top-level failure, e.g. a malformed zip. Component problems are in
    /// `component_failures`.
    pub error_message: Option<String>,
    pub components_deployed: u32,
    pub component_errors: u32,
    pub components_total: u32,
    pub component_failures: Vec<ComponentFailure>,
    pub component_successes: Vec<ComponentSuccess>,
    pub test_failures: Vec<TestFailure>,
}

/// One `<componentFailures>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFailure {
    pub component_type: Option<String>,
    pub file_name: Option<String>,
    pub full_name: Option<String>,
    pub problem: String,
    pub problem_type: String,
}

/// One `<componentSuccesses>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSuccess {
    pub component_type: Option<String>,
    pub file_name: Option<String>,
    pub full_name: Option<String>,
    pub id: Option<String>,
    pub created: bool,
    pub changed: bool,
    pub deleted: bool,
}

/// One Apex test failure from `<runTestResult>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFailure {
    /// Test class name.
    pub name: Option<String>,
    pub method_name: Option<String>,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
}

impl TestFailure {
    /// `Class.method`, or whichever half is known.
    pub fn qualified_name(&self) -> String {
        match (&self.name, &self.method_name) {
            (Some(class), Some(method)) => format!("{}.{}", class, method),
            (Some(class), None) => class.clone(),
            (None, Some(method)) => method.clone(),
            (None, None) => String::new(),
        }
    }
}
