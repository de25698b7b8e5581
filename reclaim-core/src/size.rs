pub const KIB: u64 = 1024;
pub const MIB: u64 = KIB * 1024;
pub const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Format bytes into human-readable string
pub fn format_size(bytes: u64) -> String {
    if bytes >= TIB {
        format!("{:.1} TB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Megabytes with two decimals, used for per-file findings
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MIB as f64)
}

/// Format a number with thousand separators (e.g., 1,234,567)
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    if s.len() <= 3 {
        return s;
    }

    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * MIB), "5.0 MB");
        assert_eq!(format_size(3 * GIB / 2), "1.50 GB");
        assert_eq!(format_size(TIB), "1.0 TB");
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(12 * MIB + MIB / 4), "12.25 MB");
        assert_eq!(format_megabytes(0), "0.00 MB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(2500), "2,500");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
