use std::process::ExitCode;

fn main() -> ExitCode {
    linfit::logging::init();

    match linfit::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("exiting with {err:?}");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
