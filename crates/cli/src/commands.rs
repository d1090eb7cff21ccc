//! CLI subcommands.

use clap::Subcommand;
use corelib::{NodeRecord, NodeRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List registered nodes in insertion order
    Show,
    /// Look a node up by hostname
    Lookup { name: String },
    /// Print the failover group containing a node
    SpareSet { name: String },
    /// Print the next pnid that would be allocated
    NextFree,
    /// Dump the registry as JSON
    Dump,
}

/// Rendered output of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub output: String,
    /// False when a lookup came back empty.
    pub found: bool,
}

impl CommandResult {
    fn found(output: String) -> Self {
        Self {
            output,
            found: true,
        }
    }

    fn missing(output: String) -> Self {
        Self {
            output,
            found: false,
        }
    }
}

fn describe(record: &NodeRecord) -> String {
    let mut line = format!("{:>4}  {}", record.pnid(), record.name());
    let cores = record.excluded_cores();
    if !cores.is_none() {
        line.push_str(&format!("  excluded-cores={}-{}", cores.first, cores.last));
    }
    if record.is_spare() {
        let targets: Vec<String> = record
            .backup_targets()
            .iter()
            .map(|p| p.to_string())
            .collect();
        line.push_str(&format!("  spare backs=[{}]", targets.join(",")));
    }
    line
}

impl Command {
    pub fn execute(&self, registry: &NodeRegistry) -> anyhow::Result<CommandResult> {
        let result = match self {
            Command::Show => {
                let mut out = format!(
                    "{} of {} nodes, {} spare\n",
                    registry.len(),
                    registry.max_nodes(),
                    registry.spare_count()
                );
                for record in registry.iter() {
                    out.push_str(&describe(record));
                    out.push('\n');
                }
                CommandResult::found(out)
            }
            Command::Lookup { name } => match registry.find_by_name(name) {
                Some(record) => CommandResult::found(format!("{}\n", describe(record))),
                None => CommandResult::missing(format!("{}: not registered\n", name)),
            },
            Command::SpareSet { name } => {
                let set = registry.compute_spare_set(name);
                if set.is_empty() {
                    CommandResult::missing(format!("{}: not in any spare set\n", name))
                } else {
                    let mut out = String::new();
                    for record in set.iter() {
                        out.push_str(&describe(record));
                        out.push('\n');
                    }
                    CommandResult::found(out)
                }
            }
            Command::NextFree => match registry.next_free_pnid() {
                Some(pnid) => CommandResult::found(format!("{}\n", pnid)),
                None => CommandResult::missing("registry full\n".to_string()),
            },
            Command::Dump => {
                let json = serde_json::to_string_pretty(&registry.snapshot())?;
                CommandResult::found(json + "\n")
            }
        };
        Ok(result)
    }
}
