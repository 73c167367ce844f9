use std::path::Path;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use serde::Serialize;

/// Raw Solidity statements emitted as a dedicated function of the migration contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomSolidity {
    pub name: String,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InstructionBody {
    Call {
        function: String,
        /// Solidity types of the function inputs, e.g. `address[]`.
        param_types: Vec<String>,
        #[serde(skip)]
        args: Vec<DynSolValue>,
    },
    Custom(CustomSolidity),
}

/// A write that was recorded instead of sent, to be executed later by a migration contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationInstruction {
    pub contract: String,
    pub source: String,
    pub target: Address,
    pub comment: String,
    pub body: InstructionBody,
}

#[derive(Debug, Clone, Default)]
pub struct MigrationScript {
    instructions: Vec<MigrationInstruction>,
}

impl MigrationScript {
    pub fn push(&mut self, instruction: MigrationInstruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[MigrationInstruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Renders every recorded instruction, in order, as the `migrate()` function of `contract_name`.
    pub fn render(&self, contract_name: &str, explorer_link_prefix: &str) -> String {
        let mut migrate = Vec::new();
        let mut custom_functions = Vec::new();

        for (index, instruction) in self.instructions.iter().enumerate() {
            migrate.push(format!("// {}", instruction.comment));
            match &instruction.body {
                InstructionBody::Call { function, param_types, args } => {
                    if !explorer_link_prefix.is_empty() {
                        migrate.push(format!("// {explorer_link_prefix}/address/{}", instruction.target));
                    }
                    let mut call_args = Vec::with_capacity(args.len());
                    for (arg_index, arg) in args.iter().enumerate() {
                        let ty = param_types.get(arg_index).map(String::as_str).unwrap_or_default();
                        match arg {
                            DynSolValue::Array(values) => {
                                let local = format!("{function}_{index}_{arg_index}");
                                migrate.push(format!("{ty} memory {local} = new {ty}({});", values.len()));
                                for (i, value) in values.iter().enumerate() {
                                    migrate.push(format!("{local}[{i}] = {};", solidity_literal(value)));
                                }
                                call_args.push(local);
                            }
                            other => call_args.push(solidity_literal(other)),
                        }
                    }
                    migrate.push(format!(
                        "{}({}).{}({});",
                        instruction.source,
                        instruction.target,
                        function,
                        call_args.join(", ")
                    ));
                }
                InstructionBody::Custom(custom) => {
                    migrate.push(format!("{}();", custom.name));
                    custom_functions.push(custom);
                }
            }
            migrate.push(String::new());
        }
        // no blank line before the closing brace
        migrate.pop();

        let mut out = String::new();
        out.push_str("// SPDX-License-Identifier: MIT\n");
        out.push_str("pragma solidity ^0.5.16;\n\n");
        out.push_str(&format!("contract {contract_name} {{\n"));
        out.push_str("    function migrate() external {\n");
        for line in &migrate {
            push_line(&mut out, 2, line);
        }
        out.push_str("    }\n");

        for custom in custom_functions {
            out.push_str(&format!("\n    function {}() internal {{\n", custom.name));
            for line in &custom.instructions {
                let line = if line.starts_with("//") || line.ends_with(';') { line.clone() } else { format!("{line};") };
                push_line(&mut out, 2, &line);
            }
            out.push_str("    }\n");
        }
        out.push_str("}\n");
        out
    }

    pub fn write_to(&self, path: &Path, contract_name: &str, explorer_link_prefix: &str) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.render(contract_name, explorer_link_prefix))
    }
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    if !line.is_empty() {
        out.push_str(&"    ".repeat(depth));
        out.push_str(line);
    }
    out.push('\n');
}

/// Solidity source literal of a value. Dynamic arrays need a memory local and are handled by the caller.
pub fn solidity_literal(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            format!("bytes{size}(0x{})", alloy::hex::encode(&word[..*size]))
        }
        DynSolValue::Bytes(bytes) => format!("hex\"{}\"", alloy::hex::encode(bytes)),
        DynSolValue::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        DynSolValue::Array(values) | DynSolValue::FixedArray(values) | DynSolValue::Tuple(values) => {
            format!("[{}]", values.iter().map(solidity_literal).collect::<Vec<_>>().join(", "))
        }
        other => format!("/* unsupported value {other:?} */"),
    }
}
