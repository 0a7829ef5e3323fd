use std::process::ExitCode;

fn main() -> ExitCode {
    match corpus_splitter::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
