//! Printer discovery and role assignment
//!
//! Installed printers are matched by name against a set of tokens and
//! sorted, so "Copy 1" / "Copy 2" style names map to the same roles on
//! every start.

use std::fmt;

/// Case-insensitive substring match against one or more tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterPattern {
    tokens: Vec<String>,
}

impl PrinterPattern {
    /// Build a pattern from tokens. Blank tokens are ignored.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    /// Parse a comma separated token list (e.g. `"xp-,xprinter"`)
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether a printer name contains any of the tokens
    pub fn matches(&self, printer_name: &str) -> bool {
        let name = printer_name.to_lowercase();
        self.tokens.iter().any(|t| name.contains(t.as_str()))
    }

    /// Filter installed printers down to the matching ones, sorted ascending
    /// ignoring case
    pub fn discover<S: AsRef<str>>(&self, installed: &[S]) -> Vec<String> {
        let mut matched: Vec<String> = installed
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| self.matches(p))
            .map(str::to_string)
            .collect();
        matched.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        matched.dedup();
        matched
    }
}

impl Default for PrinterPattern {
    fn default() -> Self {
        Self::new(["xp-", "xprinter"])
    }
}

impl fmt::Display for PrinterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(","))
    }
}

/// One role slot and the printer bound to it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSlot {
    pub label: String,
    pub printer: Option<String>,
}

/// Printers bound to fixed roles, in role order
///
/// With the default two roles this is the kitchen/cashier pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    slots: Vec<RoleSlot>,
}

impl RoleAssignment {
    /// Bind sorted matches to roles. Extra matches are ignored and
    /// missing ones leave the slot empty.
    pub fn assign<S: AsRef<str>>(labels: &[S], matched: &[String]) -> Self {
        let slots = labels
            .iter()
            .enumerate()
            .map(|(i, label)| RoleSlot {
                label: label.as_ref().to_string(),
                printer: matched.get(i).cloned(),
            })
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[RoleSlot] {
        &self.slots
    }

    pub fn role_count(&self) -> usize {
        self.slots.len()
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.printer.is_some()).count()
    }

    /// Every role has a printer
    pub fn is_complete(&self) -> bool {
        !self.slots.is_empty() && self.assigned_count() == self.slots.len()
    }

    /// Printer for role 1 (kitchen)
    pub fn primary(&self) -> Option<&str> {
        self.printer_at(0)
    }

    /// Printer for role 2 (cashier)
    pub fn secondary(&self) -> Option<&str> {
        self.printer_at(1)
    }

    fn printer_at(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.printer.as_deref())
    }
}
