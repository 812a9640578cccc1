use clap::{ArgAction, Parser, Subcommand};
use std::process;

use brick_audit_helper::ccram::{self, CcramArgs};
use brick_audit_helper::debug::set_debug;
use brick_audit_helper::ui_ram::{self, UiRamArgs};

#[derive(Parser, Debug)]
#[command(
    name = "brick-audit-helper",
    about = "Build-verification helpers for Brick firmware",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: AuditCommand,
}

#[derive(Subcommand, Debug)]
enum AuditCommand {
    /// Validate CCRAM (.ram4) layout of a linked ELF
    Ccram(CcramArgs),
    /// Rebuild the UI/LED modules and report tagged RAM symbol footprints
    UiRam(UiRamArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // Keep the handle alive for the whole run; dropping it stops the logger.
    let _logger = flexi_logger::Logger::try_with_str(level)
        .and_then(|logger| logger.log_to_stderr().start())
        .ok();
    set_debug(cli.verbose > 1);

    let outcome = match cli.command {
        AuditCommand::Ccram(args) => ccram::run(args),
        AuditCommand::UiRam(args) => ui_ram::run(args),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    }
}
