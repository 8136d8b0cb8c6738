//! Print the OpenAPI document as JSON.

use std::io::{self, Write};

use color_eyre::eyre::{Context, Result};
use explore::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise OpenAPI document")?;
    writeln!(io::stdout().lock(), "{json}").wrap_err("failed to write OpenAPI document")?;
    Ok(())
}
