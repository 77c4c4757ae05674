//! 숫자 표시 형식.

/// 천 단위 구분 기호 (1234567 → "1,234,567")
pub fn comma(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// IEC 바이트 단위 (1536 → "1.5 KiB")
pub fn iec_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exp = 0;
    let mut divisor = 1u64;
    while exp < UNITS.len() - 1 && bytes / divisor >= 1024 {
        divisor *= 1024;
        exp += 1;
    }
    let value = (bytes as f64 / divisor as f64 * 10.0 + 0.5).floor() / 10.0;

    if value < 10.0 {
        format!("{value:.1} {}", UNITS[exp])
    } else {
        format!("{value:.0} {}", UNITS[exp])
    }
}
