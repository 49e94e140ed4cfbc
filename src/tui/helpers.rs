//! Formatting helpers shared by the render functions

/// Formats a byte count with a binary unit suffix, e.g. `1.5 KB`
pub fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if size < 1024 {
        return format!("{} B", size);
    }

    let mut value = size as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Fraction of `total` that is `done`, clamped to `0.0..=1.0`
pub fn calculate_progress(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(0, 0), 0.0);
        assert_eq!(calculate_progress(0, 4), 0.0);
        assert_eq!(calculate_progress(1, 4), 0.25);
        assert_eq!(calculate_progress(4, 4), 1.0);
        assert_eq!(calculate_progress(5, 4), 1.0);
    }
}
