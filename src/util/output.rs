use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use console::style;

const QUIET: u8 = 0;
const NORMAL: u8 = 1;
const VERBOSE: u8 = 2;

static LEVEL: AtomicU8 = AtomicU8::new(NORMAL);

/// Apply the global `-v`/`-q`/`--no-color` flags.
pub fn configure(verbose: u8, quiet: bool, no_color: bool) {
    let level = if quiet {
        QUIET
    } else if verbose > 0 {
        VERBOSE
    } else {
        NORMAL
    };
    LEVEL.store(level, Ordering::Relaxed);
    if no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

fn level() -> u8 {
    LEVEL.load(Ordering::Relaxed)
}

pub fn debug(message: &str) {
    if level() >= VERBOSE {
        let _ = writeln!(io::stderr(), "{} {}", style("debug").dim(), message);
    }
}

pub fn success(message: &str) {
    if level() >= NORMAL {
        let _ = writeln!(io::stderr(), "{}", style(message).green());
    }
}

pub fn warn(message: &str) {
    if level() >= NORMAL {
        let _ = writeln!(io::stderr(), "{}", style(message).yellow());
    }
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}
