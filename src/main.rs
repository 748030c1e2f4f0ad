mod cli;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "riserkernel", about = "Fire-alarm riser diagram compiler — spec JSON → routed geometry")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a spec into diagram geometry JSON (and optionally DXF).
    Compile {
        /// Path to the spec JSON file.
        spec: String,
        /// Write geometry JSON here instead of stdout.
        #[arg(short, long)]
        output: Option<String>,
        /// Also write a DXF rendition of the geometry.
        #[arg(long)]
        dxf: Option<String>,
    },
    /// Validate a spec without producing geometry.
    Check {
        /// Path to the spec JSON file.
        spec: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Compile { spec, output, dxf } => {
            cli::compile::run(&spec, output.as_deref(), dxf.as_deref())
        }
        Command::Check { spec } => cli::check::run(&spec),
    }
}
