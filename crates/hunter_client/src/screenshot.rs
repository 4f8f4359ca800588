/// Resolves the public URL of a screenshot from the scan's `output_dir`.
///
/// The backend stores screenshots under `data/<folder>/` where `<folder>`
/// is the LAST path segment of `output_dir` — which may be a POSIX or a
/// Windows host path, so both separators split. A trailing separator
/// yields no folder and therefore no URL, matching the backend's static
/// file layout exactly.
pub fn screenshot_url(base: &str, output_dir: &str, file: &str) -> Option<String> {
    if file.is_empty() {
        return None;
    }
    let folder = output_dir
        .rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty())?;
    Some(format!(
        "{}/data/{}/{}",
        base.trim_end_matches('/'),
        folder,
        file
    ))
}

#[cfg(test)]
mod tests {
    use super::screenshot_url;

    #[test]
    fn takes_last_segment_of_posix_path() {
        assert_eq!(
            screenshot_url(
                "http://localhost:8000",
                "/app/data/screenshots_Aeron_2024",
                "deal_1.png"
            )
            .as_deref(),
            Some("http://localhost:8000/data/screenshots_Aeron_2024/deal_1.png")
        );
    }

    #[test]
    fn takes_last_segment_of_windows_path() {
        assert_eq!(
            screenshot_url(
                "http://localhost:8000",
                r"C:\hunter\data\screenshots_Mini_PC",
                "shot.png"
            )
            .as_deref(),
            Some("http://localhost:8000/data/screenshots_Mini_PC/shot.png")
        );
    }

    #[test]
    fn bare_folder_name_passes_through() {
        assert_eq!(
            screenshot_url("http://localhost:8000/", "screenshots_X", "a.png").as_deref(),
            Some("http://localhost:8000/data/screenshots_X/a.png")
        );
    }

    #[test]
    fn trailing_separator_or_missing_file_yields_none() {
        assert_eq!(
            screenshot_url("http://localhost:8000", "/app/data/screenshots_X/", "a.png"),
            None
        );
        assert_eq!(
            screenshot_url("http://localhost:8000", "/app/data/screenshots_X", ""),
            None
        );
    }
}
