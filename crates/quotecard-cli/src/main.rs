mod args;
mod config;
mod interactive;
mod io;
mod logging;
mod parse;
mod run;

fn main() {
    logging::init_logging();
    if let Err(err) = run::run() {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
