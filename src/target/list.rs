use crate::InputError;
use std::path::Path;

/// Reads a newline-delimited list file
///
/// Lines are trimmed; blank lines and lines starting with `#` are ignored.
/// Used for both URL lists and user-agent lists.
///
/// # Arguments
///
/// * `path` - Path to the list file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The non-comment entries in file order
/// * `Err(InputError)` - The file is missing or could not be read
pub fn read_list_file(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InputError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            InputError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    Ok(parse_list(&content))
}

/// Extracts list entries from file content
fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
