use std::path::PathBuf;

use clap::Parser;

/// CLI surface definition. A single optional positional argument.
#[derive(Parser, Debug)]
#[command(
    name = "keygen",
    about = "Generate an X25519 keypair (private.pem, public.pem) without overwriting existing keys",
    version
)]
pub struct Cli {
    /// Directory to write the keypair into; prompted for when absent.
    pub directory: Option<PathBuf>,
}
