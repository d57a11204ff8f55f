//! Prints one message per level so the color mapping, prefixes, and repeat
//! suppression can be eyeballed on a real terminal:
//!
//! ```sh
//! cargo run --example levels_demo
//! TERMLOG_FORCE_256COLOR=1 cargo run --example levels_demo
//! ```

use termlog::{Context, Flags, Level, Logger, log};

fn main() {
    let logger = Logger::global();
    logger.set_level(Level::TRACE);
    logger.set_flags(Flags::SKIP_REPEATED | Flags::PRINT_LEVEL);

    let ctx = Context::with_origin("demo", "main");
    for level in [
        Level::PANIC,
        Level::FATAL,
        Level::ERROR,
        Level::WARNING,
        Level::INFO,
        Level::VERBOSE,
        Level::DEBUG,
        Level::TRACE,
    ] {
        log!(&ctx, level, "a {} message\n", level);
    }

    log!(&ctx, Level::DEBUG.with_tint(134), "tinted debug (256-color terminals)\n");

    for _ in 0..4 {
        log!(None, Level::INFO, "repeated line\n");
    }
    log!(None, Level::QUIET, "");
}
