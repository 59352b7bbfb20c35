#[cfg(target_os = "linux")]
mod linux;
#[cfg(any(target_os = "linux", test))]
mod maps;
#[cfg(windows)]
mod win32;

#[cfg(target_os = "linux")]
pub use linux::{ProcessHandle, find_process_id};
#[cfg(windows)]
pub use win32::{ProcessHandle, find_process_id};

/// Case-insensitive prefix match of `name` against an executable name.
///
/// The first `name.len()` characters of `exe` must equal `name`, so `"note"` matches
/// `"notepad.exe"` but `"notepad.exe.bak"` matches no executable named `"notepad.exe"`. An empty
/// name matches nothing.
pub fn name_matches(exe: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let mut exe_chars = exe.chars().flat_map(char::to_lowercase);
    name.chars()
        .flat_map(char::to_lowercase)
        .all(|c| exe_chars.next() == Some(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_match_is_case_insensitive() {
        assert!(name_matches("Notepad.exe", "notepad.exe"));
        assert!(name_matches("Notepad.exe", "NOTE"));
        assert!(name_matches("firefox", "firefox"));
    }

    #[test]
    fn longer_name_does_not_match() {
        assert!(!name_matches("note", "notepad.exe"));
        assert!(!name_matches("calc.exe", "notepad"));
        assert!(!name_matches("calc.exe", ""));
    }
}
