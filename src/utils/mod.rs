use std::sync::LazyLock;

use regex::Regex;

pub const REQUIRED_EXTENSION: &str = "pbit";

const DOWNLOAD_PREFIX: &str = "documentacao_";
const DOWNLOAD_SUFFIX: &str = "_erd_final.pdf";
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

static EXTENSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\.{}$", REQUIRED_EXTENSION)).expect("extension pattern is valid")
});

/// Case-insensitive check for the `.pbit` extension
pub fn has_required_extension(file_name: &str) -> bool {
    EXTENSION_SUFFIX.is_match(file_name)
}

/// Human-readable size with binary prefixes, e.g. `1536 -> "1.5 KB"`
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // floor(log_1024(bytes)) in integers, clamped to the last unit
    let mut i = 0;
    while i + 1 < SIZE_UNITS.len() && bytes >= 1u64 << (10 * (i + 1)) {
        i += 1;
    }

    let value = bytes as f64 / (1u64 << (10 * i)) as f64;
    let rounded = (value * 100.0).round() / 100.0;

    // f64's Display already drops trailing zeros: 1.50 -> "1.5", 1.00 -> "1"
    format!("{} {}", rounded, SIZE_UNITS[i])
}

/// Name offered when saving the processed result of `file_name`
pub fn download_file_name(file_name: &str) -> String {
    let stem = EXTENSION_SUFFIX.replace(file_name, DOWNLOAD_SUFFIX);
    format!("{}{}", DOWNLOAD_PREFIX, stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_required_extension() {
        assert!(has_required_extension("report.pbit"));
        assert!(has_required_extension("REPORT.PBIT"));
        assert!(has_required_extension("my.sales.PbIt"));
        assert!(!has_required_extension("report.pbix"));
        assert!(!has_required_extension("report.pbit.zip"));
        assert!(!has_required_extension("pbit"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10_000), "9.77 KB");
        assert_eq!(format_file_size(1_048_576), "1 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }

    #[test]
    fn test_format_file_size_clamps_to_gb() {
        assert_eq!(format_file_size(1_099_511_627_776), "1024 GB");
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            download_file_name("report.pbit"),
            "documentacao_report_erd_final.pdf"
        );
        assert_eq!(
            download_file_name("Sales.PBIT"),
            "documentacao_Sales_erd_final.pdf"
        );
        assert_eq!(
            download_file_name("a.pbit.b.pbit"),
            "documentacao_a.pbit.b_erd_final.pdf"
        );
    }

    #[test]
    fn test_download_file_name_is_stable_across_calls() {
        for _ in 0..3 {
            assert_eq!(
                download_file_name("Model.Pbit"),
                "documentacao_Model_erd_final.pdf"
            );
        }
        // Only a trailing extension is swapped
        assert_eq!(download_file_name("report.pbix"), "documentacao_report.pbix");
    }
}
