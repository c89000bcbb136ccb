// Image extension checks

/// Extensions accepted for upload, lowercase and without the leading dot.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Lowercased suffix after the final `.` of the last path component.
///
/// Hidden files such as `.png` and names ending in `.` have no extension.
pub fn extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 == name.len() => None,
        Some(idx) => Some(name[idx + 1..].to_ascii_lowercase()),
    }
}

pub fn is_valid_image(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// `".jpg, .jpeg, ..."`, used in rejection messages.
pub fn allowed_extensions_list() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}
