//! Plain-text rendering of a classification

use std::fmt;
use std::io::{self, Write};

use crate::classify::ClassificationResult;

pub struct Report<'a> {
    result: &'a ClassificationResult,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a ClassificationResult) -> Self {
        Self { result }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, title: &str, names: &[String]) -> fmt::Result {
    if names.is_empty() {
        writeln!(f, "Unused {title}: none")
    } else {
        writeln!(f, "Unused {title}: {}", names.join(", "))
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_group(f, "Variables", &self.result.variables)?;
        write_group(f, "Functions", &self.result.functions)?;
        write_group(f, "Components", &self.result.components)?;
        write_group(f, "Exports", &self.result.unused_exports)
    }
}

pub fn report(result: &ClassificationResult, writer: &mut dyn Write) -> io::Result<()> {
    write!(writer, "{}", Report::new(result))
}
