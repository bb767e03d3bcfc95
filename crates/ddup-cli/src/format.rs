pub(crate) fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Human-readable size followed by the exact byte count.
pub(crate) fn format_size_with_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format_bytes(bytes);
    }
    format!("{}  ({bytes} bytes)", format_bytes(bytes))
}

pub(crate) fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{r:.2}"),
        None => "-".to_string(),
    }
}
