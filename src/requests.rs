//src/requests.rs

use std::io::{self, BufRead};
use std::path::Path;

use crate::input::open_input;

/// Reads one requested identifier per line, in file order.
/// Trailing whitespace is stripped; blank lines are kept and will simply
/// match nothing.
pub fn read_requests<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    parse_requests(open_input(path)?)
}

pub fn parse_requests<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    reader
        .lines()
        .map(|line| line.map(|l| l.trim_end().to_string()))
        .collect()
}
