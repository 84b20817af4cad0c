//! In-memory [`RemoteSyncClient`] for orchestration tests.

use std::cell::RefCell;

use crate::deploy::{DeployResult, DeploymentOptions};
use crate::error::{Error, ErrorKind, Result};
use crate::file_set::FileSet;
use crate::query::MetadataQueryElement;
use crate::remote::RemoteSyncClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Retrieve(Vec<MetadataQueryElement>),
    RetrievePackage(String),
    Deploy(FileSet, DeploymentOptions),
}

#[derive(Debug, Default)]
pub(crate) struct FakeRemote {
    pub retrieved: FileSet,
    pub deploy_result: DeployResult,
    pub fail_with: Option<String>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeRemote {
    pub fn returning(files: FileSet) -> Self {
        Self {
            retrieved: files,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn outcome<T>(&self, value: T) -> Result<T> {
        match &self.fail_with {
            Some(message) => Err(Error::new(ErrorKind::Transport(message.clone()))),
            None => Ok(value),
        }
    }
}

impl RemoteSyncClient for FakeRemote {
    async fn retrieve(&self, query: &[MetadataQueryElement]) -> Result<FileSet> {
        self.calls.borrow_mut().push(Call::Retrieve(query.to_vec()));
        self.outcome(self.retrieved.clone())
    }

    async fn retrieve_package(&self, name: &str) -> Result<FileSet> {
        self.calls
            .borrow_mut()
            .push(Call::RetrievePackage(name.to_string()));
        self.outcome(self.retrieved.clone())
    }

    async fn deploy(&self, files: &FileSet, options: &DeploymentOptions) -> Result<DeployResult> {
        self.calls
            .borrow_mut()
            .push(Call::Deploy(files.clone(), *options));
        self.outcome(self.deploy_result.clone())
    }
}
