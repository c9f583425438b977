use std::io;

use eml_stream::{Builder, ParserConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eml_stream::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = ParserConfig::default();
    let result = Builder::new(config).parse(io::stdin().lock())?;

    let parts = result.root.walk().count();
    println!(
        "{} parts, {} warnings, {} bytes",
        parts,
        result.warnings.len(),
        result.root.offsets.end
    );
    Ok(())
}
