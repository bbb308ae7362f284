use std::io::Read;
use lazy_static::lazy_static;
use regex::Regex;
use crate::error::SimulationError;
use crate::pattern::Access;

lazy_static! {
    static ref TRACE_LINE: Regex = Regex::new(
        r"^(?:(?P<op>[RrWw])\s+)?(?:0[xX](?P<hex>[0-9a-fA-F]+)|(?P<dec>[0-9]+))$"
    ).expect("trace line pattern is valid");
}

/// Parses a text trace into accesses
///
/// Each line is `R <address>`, `W <address>`, or a bare address, where an address is decimal or
/// `0x` prefixed hexadecimal. Bare addresses pick their operation with `Access::from_address`.
/// Blank lines and lines starting with `#` are skipped
///
/// # Examples
///
/// ```
/// use fscachelib::pattern::Access;
/// use fscachelib::trace::parse_trace;
/// let accesses = parse_trace("# header\nR 0x1000\nW 8192\n4096\n").unwrap();
/// assert_eq!(accesses, vec![Access::read(4096), Access::write(8192), Access::read(4096)]);
/// ```
pub fn parse_trace(input: &str) -> Result<Vec<Access>, SimulationError> {
    let mut accesses = Vec::new();
    for (number, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = || SimulationError::Trace { line: number + 1, content: raw.to_string() };
        let captures = TRACE_LINE.captures(line).ok_or_else(malformed)?;
        let address = match (captures.name("hex"), captures.name("dec")) {
            (Some(hex), _) => u64::from_str_radix(hex.as_str(), 16),
            (None, Some(dec)) => dec.as_str().parse::<u64>(),
            (None, None) => return Err(malformed()),
        }.map_err(|_| malformed())?;
        let access = match captures.name("op").map(|op| op.as_str()) {
            Some("R") | Some("r") => Access::read(address),
            Some(_) => Access::write(address),
            None => Access::from_address(address),
        };
        accesses.push(access);
    }
    Ok(accesses)
}

/// Reads a whole trace and parses it
pub fn read_trace<Source: Read>(mut reader: Source) -> Result<Vec<Access>, SimulationError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    parse_trace(&contents)
}
