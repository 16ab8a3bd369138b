//! Applying parsed instructions to a directory of contracts.
//!
//! Directives are grouped by contract. Each contract is loaded once, its
//! directives are applied in instruction order on top of each other, and the
//! result is written to the output directory. Failures are contained per
//! directive ([`SkipReason`]) or per contract ([`InserterError`]); the batch
//! itself only fails when its output directory is unusable.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{contract_path, validate_contract_number};
use crate::document::ContractDocument;
use crate::error::{InserterError, Result};
use crate::instructions::ParsedInstructions;
use crate::output::save_contract;
use crate::resolve::{Resolution, Resolver};
use crate::sentence::OffsetPolicy;
use crate::types::{ContractId, DirectiveRecord, InsertionDirective};

/// Where contracts are read from and written to.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub contracts_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policy: OffsetPolicy,
}

impl BatchOptions {
    /// Options with the default (paragraph) offset policy.
    #[must_use]
    pub fn new(contracts_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            contracts_dir: contracts_dir.into(),
            output_dir: output_dir.into(),
            policy: OffsetPolicy::default(),
        }
    }

    /// Use `policy` to place inserted sentences.
    #[must_use]
    pub fn with_policy(mut self, policy: OffsetPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// What happened to one directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DirectiveStatus {
    Applied,
    Skipped { reason: String },
}

/// A directive and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveOutcome {
    pub directive: DirectiveRecord,
    #[serde(flatten)]
    pub status: DirectiveStatus,
}

/// Outcome of processing one contract.
#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub contract: String,
    /// Updated file, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub applied: usize,
    pub directives: Vec<DirectiveOutcome>,
    /// Error that stopped work on this contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContractReport {
    /// Number of directives that were skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d.status, DirectiveStatus::Skipped { .. }))
            .count()
    }
}

/// An instruction block that produced no directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBlockRecord {
    pub contract: String,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub skipped_blocks: Vec<SkippedBlockRecord>,
    pub contracts: Vec<ContractReport>,
}

impl BatchReport {
    /// Total number of applied directives.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.contracts.iter().map(|c| c.applied).sum()
    }

    /// Contracts that failed outright.
    pub fn failed(&self) -> impl Iterator<Item = &ContractReport> {
        self.contracts.iter().filter(|c| c.error.is_some())
    }
}

/// Group directives by contract, in order of first appearance.
///
/// Directives keep their instruction order within a group.
#[must_use]
pub fn group_by_contract(
    directives: &[InsertionDirective],
) -> Vec<(ContractId, Vec<&InsertionDirective>)> {
    let mut groups: Vec<(ContractId, Vec<&InsertionDirective>)> = Vec::new();

    for directive in directives {
        match groups.iter_mut().find(|(id, _)| *id == directive.contract) {
            Some((_, group)) => group.push(directive),
            None => groups.push((directive.contract.clone(), vec![directive])),
        }
    }

    groups
}

/// Apply directives one after another.
///
/// Every directive is resolved against the document as edited by the ones
/// before it, so labels and sentence positions are current. A directive
/// whose edit fails is skipped and the document stays as it was before it.
#[must_use]
pub fn apply_directives(
    mut document: ContractDocument,
    directives: &[&InsertionDirective],
    resolver: &Resolver,
) -> (ContractDocument, Vec<DirectiveOutcome>) {
    let mut outcomes = Vec::with_capacity(directives.len());

    for directive in directives {
        let record = DirectiveRecord::from(*directive);
        let resolution = resolver.resolve(&document, directive);

        let status = match resolution.apply(&document, &directive.text) {
            Ok(Some(edited)) => {
                document = edited;
                DirectiveStatus::Applied
            }
            Err(e) => {
                warn!(
                    contract = %directive.contract,
                    section = directive.mode.section().unwrap_or_default(),
                    error = %e,
                    "edit failed, skipping directive"
                );
                DirectiveStatus::Skipped {
                    reason: format!("edit failed: {e}"),
                }
            }
            Ok(None) => {
                let reason = match &resolution {
                    Resolution::Skipped(reason) => reason.to_string(),
                    _ => "not applied".to_string(),
                };
                warn!(
                    contract = %directive.contract,
                    section = directive.mode.section().unwrap_or_default(),
                    reason = %reason,
                    "skipping directive"
                );
                DirectiveStatus::Skipped { reason }
            }
        };

        outcomes.push(DirectiveOutcome {
            directive: record,
            status,
        });
    }

    (document, outcomes)
}

/// Runs parsed instructions against a contracts directory.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    options: BatchOptions,
    resolver: Resolver,
}

impl BatchRunner {
    #[must_use]
    pub fn new(options: BatchOptions) -> Self {
        let resolver = Resolver::new(options.policy);
        Self { options, resolver }
    }

    /// The options this runner was built with.
    #[must_use]
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process every contract named in `parsed`.
    ///
    /// `on_contract` is called before each contract is processed.
    ///
    /// # Errors
    /// Returns an error if the output directory does not exist. Failures of
    /// individual contracts are recorded in the report instead.
    pub fn run(
        &self,
        parsed: &ParsedInstructions,
        mut on_contract: impl FnMut(&ContractId),
    ) -> Result<BatchReport> {
        ensure_dir(&self.options.output_dir)?;

        let contracts = group_by_contract(&parsed.directives)
            .into_iter()
            .map(|(contract, directives)| {
                on_contract(&contract);
                self.process_contract(&contract, &directives)
                    .unwrap_or_else(|e| {
                        warn!(contract = %contract, error = %e, "contract failed");
                        ContractReport {
                            contract: contract.to_string(),
                            output: None,
                            applied: 0,
                            directives: directives
                                .iter()
                                .map(|d| DirectiveOutcome {
                                    directive: DirectiveRecord::from(*d),
                                    status: DirectiveStatus::Skipped {
                                        reason: "contract not processed".to_string(),
                                    },
                                })
                                .collect(),
                            error: Some(e.to_string()),
                        }
                    })
            })
            .collect();

        Ok(BatchReport {
            generated_at: Utc::now(),
            skipped_blocks: parsed
                .skipped
                .iter()
                .map(|block| SkippedBlockRecord {
                    contract: block.contract.to_string(),
                    reason: block.reason.clone(),
                })
                .collect(),
            contracts,
        })
    }

    /// Load one contract, apply its directives and save the result.
    ///
    /// # Errors
    /// Returns an error if the contract number cannot name a file, or the
    /// contract cannot be read, parsed or written.
    pub fn process_contract(
        &self,
        contract: &ContractId,
        directives: &[&InsertionDirective],
    ) -> Result<ContractReport> {
        validate_contract_number(contract.number())?;
        let path = contract_path(&self.options.contracts_dir, contract.number());
        if !path.is_file() {
            return Err(InserterError::ContractNotFound(path));
        }

        info!(contract = %contract, directives = directives.len(), "processing contract");

        let document = ContractDocument::from_file(&path)?;
        let (document, outcomes) = apply_directives(document, directives, &self.resolver);
        let output = save_contract(&self.options.output_dir, contract, document.source())?;

        let applied = outcomes
            .iter()
            .filter(|o| o.status == DirectiveStatus::Applied)
            .count();
        info!(contract = %contract, applied, output = %output.display(), "saved contract");

        Ok(ContractReport {
            contract: contract.to_string(),
            output: Some(output),
            applied,
            directives: outcomes,
            error: None,
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(InserterError::OutputDirMissing(dir.to_path_buf()))
    }
}
