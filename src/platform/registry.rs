//! Version-store reads.

use super::PlatformError;

/// Read a string value from `HKEY_LOCAL_MACHINE\<path>`
#[cfg(target_os = "windows")]
pub fn read_local_machine_string(path: &str, value: &str) -> Result<String, PlatformError> {
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::RegKey;

    let key = RegKey::predef(HKEY_LOCAL_MACHINE).open_subkey(path)?;
    let found: String = key.get_value(value)?;
    Ok(found)
}

#[cfg(not(target_os = "windows"))]
pub fn read_local_machine_string(_path: &str, _value: &str) -> Result<String, PlatformError> {
    Err(PlatformError::Unsupported("registry lookup"))
}
