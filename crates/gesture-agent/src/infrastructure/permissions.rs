//! Accessibility trust check.
//!
//! Installing an active event tap and posting keyboard events both require
//! the process to be trusted for Accessibility.  The agent checks once at
//! startup and refuses to install anything when the check fails.

use tracing::info;

use super::event_source::EventSourceError;

/// Returns whether this process is trusted for Accessibility.
///
/// With `prompt` set, macOS shows its "grant access" dialog when the process
/// is not yet trusted; the grant only takes effect after a restart.  Other
/// platforms are never trusted.
pub fn is_trusted(prompt: bool) -> bool {
    platform_is_trusted(prompt)
}

/// Fails with [`EventSourceError::NotTrusted`] unless the process is trusted.
///
/// # Errors
///
/// Returns [`EventSourceError::NotTrusted`] when access has not been granted.
pub fn ensure_trusted(prompt: bool) -> Result<(), EventSourceError> {
    if is_trusted(prompt) {
        info!("process is trusted for accessibility");
        Ok(())
    } else {
        Err(EventSourceError::NotTrusted)
    }
}

#[cfg(target_os = "macos")]
fn platform_is_trusted(prompt: bool) -> bool {
    use core_foundation::base::{CFTypeRef, TCFType};
    use core_foundation::boolean::CFBoolean;
    use core_foundation::dictionary::CFDictionary;
    use core_foundation::string::CFString;

    #[link(name = "ApplicationServices", kind = "framework")]
    extern "C" {
        fn AXIsProcessTrustedWithOptions(options: CFTypeRef) -> bool;
    }

    let key = CFString::new("AXTrustedCheckOptionPrompt");
    let value = if prompt {
        CFBoolean::true_value()
    } else {
        CFBoolean::false_value()
    };
    let options = CFDictionary::from_CFType_pairs(&[(key.as_CFType(), value.as_CFType())]);

    unsafe { AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef() as CFTypeRef) }
}

#[cfg(not(target_os = "macos"))]
fn platform_is_trusted(_prompt: bool) -> bool {
    false
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_non_macos_fails_closed() {
        assert!(!is_trusted(false));
        assert!(matches!(ensure_trusted(false), Err(EventSourceError::NotTrusted)));
    }

    /// Smoke test: the check runs without prompting and agrees with itself.
    #[cfg(target_os = "macos")]
    #[test]
    fn test_check_without_prompt_is_consistent() {
        assert_eq!(is_trusted(false), ensure_trusted(false).is_ok());
    }
}
