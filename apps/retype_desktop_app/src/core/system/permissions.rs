use crate::core::error::SystemError;

pub fn check_accessibility_permissions() -> Result<bool, SystemError> {
    #[cfg(target_os = "macos")]
    {
        Ok(macos_accessibility_client::accessibility::application_is_trusted())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Ok(true)
    }
}

pub fn request_accessibility_permissions() -> Result<bool, SystemError> {
    #[cfg(target_os = "macos")]
    {
        Ok(macos_accessibility_client::accessibility::application_is_trusted_with_prompt())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Ok(true)
    }
}

/// Synthetic keystrokes are silently dropped on macOS without accessibility
/// trust, so refuse to start the typing loop instead.
pub fn ensure_accessibility() -> Result<(), SystemError> {
    if check_accessibility_permissions()? {
        return Ok(());
    }

    log::warn!("Accessibility access not granted, requesting it");
    if request_accessibility_permissions()? {
        return Ok(());
    }

    Err(SystemError::Permission(
        "Accessibility access is required to send keystrokes. \
         Grant it in System Settings and run again."
            .to_string(),
    ))
}
