// Storage key construction

use uuid::Uuid;

use crate::upload::validation::extension;

/// Strip surrounding whitespace and slashes from a folder prefix.
pub fn clean_prefix(prefix: &str) -> &str {
    prefix.trim().trim_matches('/')
}

/// Build a fresh, collision-free key for `original_filename` under `prefix`.
pub fn build_key(prefix: &str, original_filename: &str) -> String {
    build_key_with(prefix, original_filename, Uuid::new_v4())
}

pub fn build_key_with(prefix: &str, original_filename: &str, id: Uuid) -> String {
    let unique_name = match extension(original_filename) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    };

    match clean_prefix(prefix) {
        "" => unique_name,
        folder => format!("{}/{}", folder, unique_name),
    }
}
