//! CUPS backend
//!
//! Shells out to the CUPS command line tools:
//! - `lpstat -e` lists destinations
//! - `lpstat -d` reads the default destination
//! - `lpoptions -d` changes the default destination
//! - `lp [-d NAME]` submits a file

use super::PrinterRegistry;
use crate::error::{PrintError, PrintResult};
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, instrument};

/// Printer registry backed by CUPS
#[derive(Debug, Default, Clone)]
pub struct CupsRegistry;

impl CupsRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Whether a running CUPS scheduler is reachable
    pub fn probe() -> bool {
        Command::new("lpstat")
            .arg("-r")
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains("scheduler is running"))
            .unwrap_or(false)
    }

    fn run(program: &str, args: &[&str]) -> PrintResult<Output> {
        debug!(program, ?args, "Running CUPS command");
        let output = Command::new(program).args(args).output()?;
        Ok(output)
    }

    fn stderr_of(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).trim().to_string()
    }
}

/// Parse `lpstat -e` output: one destination per line
fn parse_destinations(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `lpstat -d` output
fn parse_default(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.split_once("system default destination:")
            .map(|(_, name)| name.trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

impl PrinterRegistry for CupsRegistry {
    fn name(&self) -> &'static str {
        "cups"
    }

    fn list_printers(&self) -> PrintResult<Vec<String>> {
        let output = Self::run("lpstat", &["-e"])?;
        if !output.status.success() {
            return Err(PrintError::Registry(format!(
                "lpstat -e failed: {}",
                Self::stderr_of(&output)
            )));
        }
        Ok(parse_destinations(&String::from_utf8_lossy(&output.stdout)))
    }

    fn default_printer(&self) -> PrintResult<Option<String>> {
        let output = Self::run("lpstat", &["-d"])?;
        if !output.status.success() {
            return Err(PrintError::Registry(format!(
                "lpstat -d failed: {}",
                Self::stderr_of(&output)
            )));
        }
        Ok(parse_default(&String::from_utf8_lossy(&output.stdout)))
    }

    #[instrument(skip(self))]
    fn set_default_printer(&self, name: &str) -> PrintResult<()> {
        let output = Self::run("lpoptions", &["-d", name])?;
        if !output.status.success() {
            return Err(PrintError::Registry(format!(
                "lpoptions -d {} failed: {}",
                name,
                Self::stderr_of(&output)
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn dispatch(&self, path: &Path, target: Option<&str>) -> PrintResult<()> {
        let path_str = path.to_string_lossy();
        let mut args: Vec<&str> = Vec::new();
        if let Some(printer) = target {
            args.extend(["-d", printer]);
        }
        args.extend(["--", &*path_str]);

        let output = Self::run("lp", &args)?;
        if !output.status.success() {
            return Err(PrintError::dispatch(
                target.unwrap_or("<default>"),
                Self::stderr_of(&output),
            ));
        }
        debug!(
            job = %String::from_utf8_lossy(&output.stdout).trim(),
            "Job queued"
        );
        Ok(())
    }

    fn supports_explicit_target(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_destinations() {
        let out = "XP-80C\nXP-80C_Copy_2\n\nPDF\n";
        assert_eq!(parse_destinations(out), vec!["XP-80C", "XP-80C_Copy_2", "PDF"]);
    }

    #[test]
    fn test_parse_default() {
        assert_eq!(
            parse_default("system default destination: XP-80C\n").as_deref(),
            Some("XP-80C")
        );
        assert_eq!(parse_default("no system default destination\n"), None);
        assert_eq!(parse_default(""), None);
    }
}
