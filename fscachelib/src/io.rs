use std::fs::File;
use std::path::Path;
use crate::error::SimulationError;
use crate::pattern::Access;
use crate::trace::parse_trace;

/// Loads and parses a trace file
///
/// On unix the file is memory mapped with sequential access advice, as the trace is parsed once
/// front to back. Other systems read it into memory
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<Access>, SimulationError> {
    let file = File::open(path)?;
    // Empty files can't be mapped
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        // Safety: the mapping is only read, and dropped before this returns
        let map = unsafe { Mmap::map(&file)? };
        map.advise(Advice::Sequential)?;
        let contents = std::str::from_utf8(&map)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        parse_trace(contents)
    }
    #[cfg(not(unix))]
    {
        crate::trace::read_trace(std::io::BufReader::new(file))
    }
}
