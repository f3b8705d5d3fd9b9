//! Schema command: print the JSON Schema of a machine-readable output.

use clap::Args;
use formalect_core::SchemaTarget;
use tracing::{debug, instrument};

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Output to describe.
    #[arg(value_enum, default_value = "report")]
    pub target: SchemaTarget,
}

/// Print the schema for `args.target` as pretty JSON.
#[instrument(name = "cmd_schema", skip_all, fields(target = ?args.target))]
pub fn cmd_schema(args: SchemaArgs) -> anyhow::Result<()> {
    let schema = args.target.schema();
    debug!("schema generated");
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_every_target() {
        assert!(cmd_schema(SchemaArgs { target: SchemaTarget::Report }).is_ok());
        assert!(cmd_schema(SchemaArgs { target: SchemaTarget::Usage }).is_ok());
    }
}
