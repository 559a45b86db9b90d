/// Format a change percentage with an explicit sign, e.g. "+0.8%".
pub fn format_change_pct(change: f64) -> String {
    format!("{:+.1}%", change)
}

/// Format a KES market cap in billions, e.g. "450.0B KES".
pub fn format_market_cap(cap_kes: f64) -> String {
    format!("{:.1}B KES", cap_kes / 1_000_000_000.0)
}

/// Format a share price in KES. NSE counters trade from under one
/// shilling to several hundred, so keep two decimals throughout.
pub fn format_price(price: f64) -> String {
    format!("{:.2} KES", price)
}

/// Format a 24h traded volume, e.g. "21.5M".
pub fn format_volume(volume: i64) -> String {
    if volume >= 1_000_000 {
        format!("{:.1}M", volume as f64 / 1_000_000.0)
    } else if volume >= 1_000 {
        format!("{:.1}K", volume as f64 / 1_000.0)
    } else {
        volume.to_string()
    }
}

/// Guess a MIME type from a file extension for the analyzer upload.
/// Advisory only; the service receives whatever bytes the user attached.
pub fn mime_type_for_path(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_pct_keeps_sign() {
        assert_eq!(format_change_pct(0.8), "+0.8%");
        assert_eq!(format_change_pct(-0.2), "-0.2%");
    }

    #[test]
    fn test_market_cap_in_billions() {
        assert_eq!(format_market_cap(450_000_000_000.0), "450.0B KES");
    }

    #[test]
    fn test_volume_scaling() {
        assert_eq!(format_volume(21_500_000), "21.5M");
        assert_eq!(format_volume(4_200), "4.2K");
        assert_eq!(format_volume(950), "950");
    }

    #[test]
    fn test_mime_type_guessing() {
        assert_eq!(mime_type_for_path("chart.PNG"), "image/png");
        assert_eq!(mime_type_for_path("report.pdf"), "application/pdf");
        assert_eq!(mime_type_for_path("noextension"), "application/octet-stream");
    }
}
