use std::process::ExitCode;

fn main() -> ExitCode {
    match rsa_edu::ui::cli::run() {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
