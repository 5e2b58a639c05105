//! repo-to-md: append a repository's text files to a Markdown document

use std::process::ExitCode;

fn main() -> ExitCode {
    match repo_to_md::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<repo_to_md::Error>().map(repo_to_md::Error::exit_code);
            ExitCode::from(code.unwrap_or(1))
        }
    }
}
