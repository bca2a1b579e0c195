//! Windows spooler backend
//!
//! Uses the Win32 printing API for enumeration and the default printer,
//! and the shell `print` / `printto` verbs to hand documents to whatever
//! application is registered for the file type.

use super::PrinterRegistry;
use crate::error::{PrintError, PrintResult};
use std::path::Path;
use tracing::{debug, instrument};

/// Ports that belong to software printers (PDF, XPS, OneNote, fax)
const VIRTUAL_PORT_PREFIXES: &[&str] = &[
    "file:",
    "portprompt:",
    "xpsport:",
    "nul:",
    "onenote",
    "wfsport:",
];

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decode a NUL-terminated UTF-16 string owned by the spooler
///
/// # Safety
/// `ptr` must be null or point to a valid NUL-terminated buffer.
unsafe fn from_wide(ptr: windows::core::PWSTR) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { ptr.to_string() }.ok()
}

fn is_software_port(port: &str) -> bool {
    let port = port.to_lowercase();
    VIRTUAL_PORT_PREFIXES.iter().any(|p| port.starts_with(p))
}

/// Printer registry backed by the Windows spooler
#[derive(Debug, Default, Clone)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        Self
    }

    fn shell_execute(verb: &str, path: &Path, printer: Option<&str>) -> PrintResult<()> {
        use windows::Win32::UI::Shell::ShellExecuteW;
        use windows::Win32::UI::WindowsAndMessaging::SW_HIDE;
        use windows::core::PCWSTR;

        let verb_w = to_wide(verb);
        let file_w = to_wide(&path.to_string_lossy());
        let dir_w = to_wide(".");
        let params_w = printer.map(|p| to_wide(&format!("\"{}\"", p)));
        let params_ptr = params_w
            .as_ref()
            .map(|p| PCWSTR::from_raw(p.as_ptr()))
            .unwrap_or_else(PCWSTR::null);

        let result = unsafe {
            ShellExecuteW(
                None,
                PCWSTR::from_raw(verb_w.as_ptr()),
                PCWSTR::from_raw(file_w.as_ptr()),
                params_ptr,
                PCWSTR::from_raw(dir_w.as_ptr()),
                SW_HIDE,
            )
        };

        // Values <= 32 are error codes
        let code = result.0 as isize;
        if code <= 32 {
            return Err(PrintError::dispatch(
                printer.unwrap_or("<default>"),
                format!("ShellExecuteW({}) returned {}", verb, code),
            ));
        }
        Ok(())
    }
}

impl PrinterRegistry for WindowsRegistry {
    fn name(&self) -> &'static str {
        "windows"
    }

    /// Printers on physical or network ports
    ///
    /// Software printers are left out so a PDF writer never takes a role.
    fn list_printers(&self) -> PrintResult<Vec<String>> {
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
        };

        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        // First call only sizes the buffer
        let _ = unsafe { EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned) };
        if needed == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; needed as usize];
        unsafe {
            EnumPrintersW(
                flags,
                None,
                5,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
        }
        .map_err(|e| PrintError::Registry(format!("EnumPrintersW: {e}")))?;

        let infos = unsafe {
            std::slice::from_raw_parts(buf.as_ptr() as *const PRINTER_INFO_5W, returned as usize)
        };

        let printers = infos
            .iter()
            .filter_map(|info| {
                let name = unsafe { from_wide(info.pPrinterName) }?;
                let port = unsafe { from_wide(info.pPortName) }.unwrap_or_default();
                if is_software_port(&port) {
                    debug!(printer = %name, port = %port, "Skipping software printer");
                    return None;
                }
                Some(name)
            })
            .collect();
        Ok(printers)
    }

    fn default_printer(&self) -> PrintResult<Option<String>> {
        use windows::Win32::Graphics::Printing::GetDefaultPrinterW;
        use windows::core::PWSTR;

        let mut len: u32 = 0;
        let _ = unsafe { GetDefaultPrinterW(None, &mut len) };
        // Zero length: no default printer configured
        if len == 0 {
            return Ok(None);
        }

        let mut buf = vec![0u16; len as usize];
        let found = unsafe { GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut len) };
        if !found.as_bool() {
            return Ok(None);
        }

        let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        String::from_utf16(&buf[..end])
            .map(Some)
            .map_err(|e| PrintError::Registry(format!("default printer name: {e}")))
    }

    #[instrument(skip(self))]
    fn set_default_printer(&self, name: &str) -> PrintResult<()> {
        use windows::Win32::Graphics::Printing::SetDefaultPrinterW;
        use windows::core::PCWSTR;

        let name_w = to_wide(name);
        let ok = unsafe { SetDefaultPrinterW(PCWSTR::from_raw(name_w.as_ptr())) };
        if !ok.as_bool() {
            return Err(PrintError::Registry(format!(
                "SetDefaultPrinterW failed: {}",
                name
            )));
        }
        debug!("Default printer set");
        Ok(())
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn dispatch(&self, path: &Path, target: Option<&str>) -> PrintResult<()> {
        match target {
            Some(printer) => Self::shell_execute("printto", path, Some(printer)),
            None => Self::shell_execute("print", path, None),
        }
    }

    fn supports_explicit_target(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_ports() {
        assert!(is_software_port("PORTPROMPT:"));
        assert!(is_software_port("XPSPort:"));
        assert!(is_software_port("OneNote (Desktop)"));
        assert!(!is_software_port("USB001"));
        assert!(!is_software_port("IP_192.168.1.50"));
    }
}
