//! rLocalTime main entrypoint.

use rlocaltime::run;
use rlocaltime::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
