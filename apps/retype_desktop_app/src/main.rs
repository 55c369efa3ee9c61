use retype_lib::RunOutcome;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match retype_lib::run() {
        Ok(RunOutcome::Completed { repetitions }) => {
            log::info!("Typed the line {} times", repetitions);
        }
        Ok(RunOutcome::Cancelled) => {
            log::info!("Nothing submitted, exiting");
        }
        Err(e) => {
            log::error!("Application error: {}", e);
            std::process::exit(1);
        }
    }
}
