pub mod seed;
pub mod serve;
pub mod train;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Print a serializable result in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Raw => serde_json::to_string(value)?,
    };
    println!("{rendered}");
    Ok(())
}
