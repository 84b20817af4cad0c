//! Deploy options and results exchanged with the remote system.

/// Deployment toggles forwarded verbatim to the remote system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploymentOptions {
    pub rollback_on_error: bool,
    pub run_all_tests: bool,
    pub check_only: bool,
    pub purge_on_delete: bool,
    pub allow_missing_files: bool,
    pub auto_update_package: bool,
    pub ignore_warnings: bool,
}

impl DeploymentOptions {
    /// Command line spelling of each toggle, without the leading dash.
    pub const FLAGS: [&'static str; 7] = [
        "rollbackonerror",
        "runalltests",
        "checkonly",
        "purgeondelete",
        "allowmissingfiles",
        "autoupdatepackage",
        "ignorewarnings",
    ];

    /// Set the toggle named `flag` to `value`. Returns `false` for unknown names.
    pub fn set_flag(&mut self, flag: &str, value: bool) -> bool {
        let toggle = match flag {
            "rollbackonerror" => &mut self.rollback_on_error,
            "runalltests" => &mut self.run_all_tests,
            "checkonly" => &mut self.check_only,
            "purgeondelete" => &mut self.purge_on_delete,
            "allowmissingfiles" => &mut self.allow_missing_files,
            "autoupdatepackage" => &mut self.auto_update_package,
            "ignorewarnings" => &mut self.ignore_warnings,
            _ => return false,
        };
        *toggle = value;
        true
    }
}

impl From<&DeploymentOptions> for busbar_sf_metadata::DeployOptions {
    fn from(options: &DeploymentOptions) -> Self {
        Self {
            allow_missing_files: options.allow_missing_files,
            auto_update_package: options.auto_update_package,
            check_only: options.check_only,
            ignore_warnings: options.ignore_warnings,
            purge_on_delete: options.purge_on_delete,
            rollback_on_error: options.rollback_on_error,
            run_all_tests: options.run_all_tests,
            single_package: true,
        }
    }
}

/// A component the remote system accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploySuccess {
    pub full_name: String,
    pub created: bool,
    pub changed: bool,
    pub deleted: bool,
    pub id: String,
}

impl DeploySuccess {
    pub fn status(&self) -> ComponentStatus {
        if self.changed {
            ComponentStatus::Changed
        } else if self.deleted {
            ComponentStatus::Deleted
        } else if self.created {
            ComponentStatus::Created
        } else {
            ComponentStatus::Unchanged
        }
    }
}

/// What a deploy did to one component. `changed` wins over `deleted`, which
/// wins over `created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Unchanged,
    Changed,
    Deleted,
    Created,
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentStatus::Unchanged => write!(f, "unchanged"),
            ComponentStatus::Changed => write!(f, "changed"),
            ComponentStatus::Deleted => write!(f, "deleted"),
            ComponentStatus::Created => write!(f, "created"),
        }
    }
}

/// A problem the remote system reported. `full_name` may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployProblem {
    pub full_name: String,
    pub problem: String,
}

/// Successes and problems of one deploy call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployResult {
    pub successes: Vec<DeploySuccess>,
    pub problems: Vec<DeployProblem>,
}

impl From<busbar_sf_metadata::DeployResult> for DeployResult {
    fn from(result: busbar_sf_metadata::DeployResult) -> Self {
        let successes = result
            .component_successes
            .into_iter()
            .map(|s| DeploySuccess {
                full_name: s.full_name.unwrap_or_default(),
                created: s.created,
                changed: s.changed,
                deleted: s.deleted,
                id: s.id.unwrap_or_default(),
            })
            .collect();

        let mut problems: Vec<DeployProblem> = result
            .component_failures
            .into_iter()
            .map(|f| DeployProblem {
                full_name: f.full_name.unwrap_or_default(),
                problem: f.problem,
            })
            .collect();

        problems.extend(result.test_failures.into_iter().map(|t| DeployProblem {
            full_name: t.qualified_name(),
            problem: t.message.unwrap_or_else(|| "Test failed".to_string()),
        }));

        if problems.is_empty() && !result.success {
            if let Some(message) = result.error_message {
                problems.push(DeployProblem {
                    full_name: String::new(),
                    problem: message,
                });
            }
        }

        Self {
            successes,
            problems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busbar_sf_metadata::{AsyncStatus, ComponentFailure, ComponentSuccess, TestFailure};

    fn remote_result(success: bool) -> busbar_sf_metadata::DeployResult {
        busbar_sf_metadata::DeployResult {
            id: "0Af000000000001".to_string(),
            done: true,
            status: if success {
                AsyncStatus::Succeeded
            } else {
                AsyncStatus::Failed
            },
            success,
            ..busbar_sf_metadata::DeployResult::default()
        }
    }

    #[test]
    fn test_status_priority() {
        let mut success = DeploySuccess::default();
        assert_eq!(success.status(), ComponentStatus::Unchanged);
        success.created = true;
        assert_eq!(success.status(), ComponentStatus::Created);
        success.deleted = true;
        assert_eq!(success.status(), ComponentStatus::Deleted);
        success.changed = true;
        assert_eq!(success.status(), ComponentStatus::Changed);
        assert_eq!(success.status().to_string(), "changed");
    }

    #[test]
    fn test_set_flag() {
        let mut options = DeploymentOptions::default();
        for flag in DeploymentOptions::FLAGS {
            assert!(options.set_flag(flag, true), "{flag}");
        }
        assert!(options.rollback_on_error && options.run_all_tests && options.check_only);
        assert!(options.purge_on_delete && options.allow_missing_files);
        assert!(options.auto_update_package && options.ignore_warnings);
        assert!(!options.set_flag("force", true));

        assert!(options.set_flag("checkonly", false));
        assert!(!options.check_only);
        assert!(options.run_all_tests);
    }

    #[test]
    fn test_options_forwarded_verbatim() {
        let options = DeploymentOptions {
            check_only: true,
            ..DeploymentOptions::default()
        };
        let remote: busbar_sf_metadata::DeployOptions = (&options).into();
        assert!(remote.check_only);
        assert!(!remote.rollback_on_error);
        assert!(!remote.ignore_warnings);
        assert!(!remote.run_all_tests);
        assert!(remote.single_package);
    }

    #[test]
    fn test_from_remote_result_maps_components() {
        let mut remote = remote_result(false);
        remote.component_successes.push(ComponentSuccess {
            full_name: Some("Author__c".to_string()),
            id: Some("01I000000000002".to_string()),
            created: true,
            ..ComponentSuccess::default()
        });
        remote.component_failures.push(ComponentFailure {
            component_type: Some("CustomObject".to_string()),
            file_name: Some("objects/Book__c.object".to_string()),
            full_name: Some("Book__c".to_string()),
            problem: "Must specify a label".to_string(),
            problem_type: "Error".to_string(),
        });
        remote.test_failures.push(TestFailure {
            name: Some("BookTest".to_string()),
            method_name: Some("testInsert".to_string()),
            message: Some("System.AssertException".to_string()),
            stack_trace: None,
        });

        let result = DeployResult::from(remote);
        assert_eq!(result.successes.len(), 1);
        assert_eq!(result.successes[0].id, "01I000000000002");
        assert_eq!(result.successes[0].status(), ComponentStatus::Created);
        assert_eq!(
            result.problems,
            vec![
                DeployProblem {
                    full_name: "Book__c".to_string(),
                    problem: "Must specify a label".to_string(),
                },
                DeployProblem {
                    full_name: "BookTest.testInsert".to_string(),
                    problem: "System.AssertException".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_top_level_error_becomes_bare_problem() {
        let mut remote = remote_result(false);
        remote.error_message = Some("No package.xml found".to_string());

        let result = DeployResult::from(remote);
        assert_eq!(result.problems.len(), 1);
        assert!(result.problems[0].full_name.is_empty());
        assert_eq!(result.problems[0].problem, "No package.xml found");
    }
}
