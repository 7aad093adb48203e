use std::io;
use std::process::ExitCode;

use clap::Parser;

use sectionsync_cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    sectionsync_cli::init_tracing();

    let stdin = io::stdin();
    let stdout = io::stdout();
    match sectionsync_cli::run(&args, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
