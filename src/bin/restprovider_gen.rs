use std::process::ExitCode;

fn main() -> ExitCode {
    // held until exit so buffered records are flushed
    let _guard = match restprovider::logging::init_logging() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    match restprovider::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
