//! Idempotent reconciliation of one piece of on-chain configuration.
//!
//! A [`ConfigurationStep`] reads the current value of a contract, compares it with what the
//! deployment expects and, only when they differ, either sends the correcting transaction or
//! records it in the [`MigrationScript`] when generating a solidity migration.
//! Running a satisfied step again is always a no-op, which is what makes a failed deployment
//! safe to resume by running the whole sequence again.

pub mod decision;
pub mod error;
pub mod migration;

use std::collections::HashSet;

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::Address;

use crate::chain::{ChainClient, TransactionOutcome};
use crate::confirm::Confirm;
use crate::types::{ContractHandle, Network};
pub use decision::{decide, Action, Expected};
pub use error::ReconcileError;
pub use migration::{CustomSolidity, InstructionBody, MigrationInstruction, MigrationScript};

/// Process wide settings every step is executed under.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub network: Network,
    /// Record writes as migration instructions instead of sending them.
    pub generate_solidity: bool,
    /// Running against a local fork of the network.
    pub use_fork: bool,
    /// Never prompt the operator.
    pub yes: bool,
    pub system_suspended: bool,
    pub explorer_link_prefix: String,
}

impl ExecutionContext {
    /// Live writes on production while the system is running need an operator's go-ahead.
    pub fn requires_confirmation(&self) -> bool {
        self.network.is_production() && !self.system_suspended && !self.use_fork && !self.yes
    }

    /// Explorer comment for generated solidity, `None` when no explorer is configured.
    pub fn explorer_comment(&self, address: Address) -> Option<String> {
        if self.explorer_link_prefix.is_empty() {
            None
        } else {
            Some(format!("// {}/address/{}", self.explorer_link_prefix, address))
        }
    }
}

/// A single unit of reconciliation work. Built per call and consumed by [`Reconciler::reconcile`].
#[derive(Debug)]
pub struct ConfigurationStep {
    pub contract: String,
    pub target: Option<ContractHandle>,
    /// Human readable signature of the accessor, e.g. `function target() view returns (address)`.
    pub read: Option<&'static str>,
    pub read_arg: Option<DynSolValue>,
    pub expected: Expected,
    /// Human readable signature of the mutating function.
    pub write: &'static str,
    pub write_args: Vec<DynSolValue>,
    pub comment: String,
    pub custom_solidity: Option<CustomSolidity>,
}

impl ConfigurationStep {
    pub fn new(contract: impl Into<String>, target: Option<&ContractHandle>, write: &'static str) -> Self {
        Self {
            contract: contract.into(),
            target: target.cloned(),
            read: None,
            read_arg: None,
            expected: Expected::Never,
            write,
            write_args: Vec::new(),
            comment: String::new(),
            custom_solidity: None,
        }
    }

    pub fn read(mut self, signature: &'static str) -> Self {
        self.read = Some(signature);
        self
    }

    pub fn read_arg(mut self, arg: DynSolValue) -> Self {
        self.read_arg = Some(arg);
        self
    }

    pub fn expect_eq(mut self, value: DynSolValue) -> Self {
        self.expected = Expected::Equals(value);
        self
    }

    pub fn expect(mut self, predicate: impl Fn(&DynSolValue) -> bool + Send + Sync + 'static) -> Self {
        self.expected = Expected::Matches(Box::new(predicate));
        self
    }

    pub fn write_arg(mut self, arg: DynSolValue) -> Self {
        self.write_args.push(arg);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn custom_solidity(mut self, custom: CustomSolidity) -> Self {
        self.custom_solidity = Some(custom);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    SkippedNoTarget,
    AlreadySatisfied,
    Recorded(MigrationInstruction),
    Submitted(TransactionOutcome),
}

impl Outcome {
    pub fn is_write(&self) -> bool {
        matches!(self, Outcome::Recorded(_) | Outcome::Submitted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionMode {
    Live,
    GenerateSolidity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WriteKey {
    target: Address,
    signature: String,
    calldata: Vec<u8>,
}

pub struct Reconciler<'a> {
    client: &'a dyn ChainClient,
    confirm: &'a dyn Confirm,
    context: ExecutionContext,
    migration: MigrationScript,
    // writes performed or recorded during this run, only consulted by steps without a read
    written: HashSet<WriteKey>,
    writes: usize,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a dyn ChainClient, confirm: &'a dyn Confirm, context: ExecutionContext) -> Self {
        Self { client, confirm, context, migration: MigrationScript::default(), written: HashSet::new(), writes: 0 }
    }

    pub fn client(&self) -> &'a dyn ChainClient {
        self.client
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn migration(&self) -> &MigrationScript {
        &self.migration
    }

    /// Writes sent or recorded so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn into_migration(self) -> MigrationScript {
        self.migration
    }

    fn mode(&self) -> ExecutionMode {
        if self.context.generate_solidity {
            ExecutionMode::GenerateSolidity
        } else {
            ExecutionMode::Live
        }
    }

    pub async fn reconcile(&mut self, step: ConfigurationStep) -> Result<Outcome, ReconcileError> {
        let Some(target) = step.target.as_ref() else {
            log::debug!("Skipping {}: contract is not available", step.contract);
            return Ok(Outcome::SkippedNoTarget);
        };

        let write = parse_function(step.write)?;
        let calldata = write.abi_encode_input(&step.write_args).map_err(|e| ReconcileError::InvalidArguments {
            contract: step.contract.clone(),
            function: write.name.clone(),
            reason: e.to_string(),
        })?;
        let key = WriteKey { target: target.address, signature: write.signature(), calldata };

        let observed = match step.read {
            Some(signature) => Some(self.read_current(&step, target.address, signature).await?),
            None => None,
        };

        if decide(observed.as_ref(), &step.expected, self.written.contains(&key)) == Action::None {
            log::info!("✓ {}.{} already set ({})", step.contract, write.name, step.comment);
            return Ok(Outcome::AlreadySatisfied);
        }

        let outcome = match self.mode() {
            ExecutionMode::GenerateSolidity => {
                let instruction = MigrationInstruction {
                    contract: step.contract.clone(),
                    source: target.source.clone(),
                    target: target.address,
                    comment: step.comment.clone(),
                    body: match step.custom_solidity {
                        Some(ref custom) => InstructionBody::Custom(custom.clone()),
                        None => InstructionBody::Call {
                            function: write.name.clone(),
                            param_types: write.inputs.iter().map(|param| param.ty.clone()).collect(),
                            args: step.write_args.clone(),
                        },
                    },
                };
                log::info!("📝 Recorded {}.{} for the migration: {}", step.contract, write.name, step.comment);
                self.migration.push(instruction.clone());
                Outcome::Recorded(instruction)
            }
            ExecutionMode::Live => {
                if self.context.requires_confirmation() {
                    let prompt = format!(
                        "Confirm: invoke {}({}) on {} at {} ({})?",
                        write.name,
                        display_args(&step.write_args),
                        step.contract,
                        target.address,
                        step.comment
                    );
                    if !self.confirm.confirm(&prompt) {
                        log::warn!("Operation cancelled at {}.{}", step.contract, write.name);
                        return Err(ReconcileError::OperatorAborted(format!("{}.{}", step.contract, write.name)));
                    }
                }

                log::info!(
                    "⏳ Invoking {}.{}({}): {}",
                    step.contract,
                    write.name,
                    display_args(&step.write_args),
                    step.comment
                );
                let transaction = self.client.send(target.address, &write, &step.write_args).await.map_err(|source| {
                    ReconcileError::WriteFailed { contract: step.contract.clone(), function: write.name.clone(), source }
                })?;
                log::info!("✅ {}.{} done [tx: {:?}]", step.contract, write.name, transaction.transaction_hash);
                Outcome::Submitted(transaction)
            }
        };

        self.written.insert(key);
        self.writes += 1;
        Ok(outcome)
    }

    async fn read_current(
        &self,
        step: &ConfigurationStep,
        target: Address,
        signature: &str,
    ) -> Result<DynSolValue, ReconcileError> {
        let function = parse_function(signature)?;
        let args: Vec<DynSolValue> = step.read_arg.iter().cloned().collect();

        let mut values = self.client.call(target, &function, &args).await.map_err(|source| {
            ReconcileError::ReadFailed { contract: step.contract.clone(), function: function.name.clone(), source }
        })?;

        if values.is_empty() {
            return Err(ReconcileError::EmptyRead { contract: step.contract.clone(), function: function.name });
        }
        Ok(values.swap_remove(0))
    }
}

/// Parses a human readable function signature such as `function setTarget(address _target)`.
pub fn parse_function(signature: &str) -> Result<Function, ReconcileError> {
    Function::parse(signature)
        .map_err(|e| ReconcileError::InvalidSignature { signature: signature.to_string(), reason: e.to_string() })
}

fn display_args(args: &[DynSolValue]) -> String {
    args.iter().map(migration::solidity_literal).collect::<Vec<_>>().join(", ")
}
