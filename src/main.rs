use std::process::ExitCode;

fn main() -> ExitCode {
    rss_notes_lib::run()
}
