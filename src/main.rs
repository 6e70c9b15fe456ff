use std::path::PathBuf;

use chainlink::commands::link::LinkOptions;
use chainlink::linker::OrderPolicy;
use chainlink::output::Format;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chainlink",
    version = chainlink::build_info::version(),
    about = "Derive prev/next navigation links for project and task boards"
)]
struct Cli {
    /// Summary output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    /// Log more (repeatable: -v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link a board document and write the result
    Link {
        /// Board document to read (`-` for stdin)
        input: PathBuf,
        /// Where to write the linked document (`-` for stdout)
        output: PathBuf,
        /// How record order is established before linking
        #[arg(long, value_enum, default_value_t = OrderPolicy::Sort)]
        order: OrderPolicy,
        /// Print the linked document as one JSON line before writing it
        #[arg(long)]
        dump: bool,
        /// Replace the output file if it already exists
        #[arg(long)]
        force: bool,
    },
    /// Load and link a board document without writing anything
    Check {
        /// Board document to read (`-` for stdin)
        input: PathBuf,
        /// How record order is established before linking
        #[arg(long, value_enum, default_value_t = OrderPolicy::Sort)]
        order: OrderPolicy,
    },
}

fn run(cli: Cli, format: Format) -> chainlink::error::Result<()> {
    match cli.command {
        Commands::Link {
            input,
            output,
            order,
            dump,
            force,
        } => {
            let options = LinkOptions { order, dump, force };
            chainlink::commands::link::run(&input, &output, &options, format)
        }
        Commands::Check { input, order } => chainlink::commands::check::run(&input, order, format),
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };

    let _logger = match chainlink::logging::init(chainlink::logging::level_for(cli.verbose, cli.quiet)) {
        Ok(handle) => Some(handle),
        Err(message) => {
            eprintln!("warning: {message}");
            None
        }
    };

    if let Err(e) = run(cli, format) {
        log::debug!("event=run_failed code={}", e.code());
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
