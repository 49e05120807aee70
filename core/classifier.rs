use std::path::Path;

const DOCKERFILE: &str = "Dockerfile";

/// Language identifier for `path`, as used by the stripper registry.
///
/// Unknown files come back as their raw extension (leading dot included, or
/// empty), which never collides with a language name.
pub fn classify(path: &Path) -> String {
    let base_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if base_name == DOCKERFILE
        || base_name
            .strip_prefix(DOCKERFILE)
            .is_some_and(|rest| rest.starts_with('.'))
    {
        return "dockerfile".to_string();
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    match ext.as_str() {
        "go" => "go".to_string(),
        "py" => "python".to_string(),
        "sh" | "bash" => "bash".to_string(),
        "" => String::new(),
        other => format!(".{}", other),
    }
}
