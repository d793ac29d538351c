use chrono::NaiveDate;

/// Excel stores dates as whole days since 1899-12-30.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial Excel itself can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= 0.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(EXCEL_EPOCH.0, EXCEL_EPOCH.1, EXCEL_EPOCH.2)?;
    epoch.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))
}

/// Parse the date encodings seen across bank exports: `DD/MM/YYYY`,
/// `YYYY-MM-DD` (an embedded time-of-day is discarded), OFX-style
/// `YYYYMMDD[...]` digit runs, and Excel serial day numbers. Returns
/// `None` when nothing matches or the date is not a real calendar day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    // OFX DTPOSTED packs time and timezone right after the date digits
    // ("20251103120000[-3:BRT]"), so the leading digit run is classified
    // before any token splitting can mangle the suffix.
    let digit_run = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digit_run >= 8 {
        return ymd8(&trimmed[..8]);
    }

    // Drop time-of-day suffixes: "2025-11-03T10:22:00", "03/11/2025 10:22".
    let token = trimmed
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or("");
    if token.is_empty() {
        return None;
    }

    if token.bytes().all(|b| b.is_ascii_digit()) {
        // Short digit runs are Excel serials (e.g. 45963 ≈ late 2025).
        if let Ok(serial) = token.parse::<u32>() {
            return excel_serial_date(f64::from(serial));
        }
        return None;
    }

    for fmt in ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(token, fmt) {
            return Some(date);
        }
    }

    None
}

fn ymd8(s: &str) -> Option<NaiveDate> {
    let y: i32 = s[0..4].parse().ok()?;
    let m: u32 = s[4..6].parse().ok()?;
    let d: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}
