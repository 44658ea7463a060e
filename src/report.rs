use sysinfo::{Disks, Networks, System};

const MAX_DISKS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub mount_point: String,
    pub filesystem: String,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub addresses: Vec<String>,
}

/// Snapshot shown by the System Information screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemReport {
    pub hostname: String,
    pub os: String,
    pub kernel: String,
    pub uptime_seconds: u64,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_total_bytes: u64,
    pub disks: Vec<DiskUsage>,
    pub interfaces: Vec<InterfaceInfo>,
}

#[must_use]
pub fn collect() -> SystemReport {
    let mut sys = System::new();
    sys.refresh_memory();

    let disks = Disks::new_with_refreshed_list();
    let mut disk_rows: Vec<DiskUsage> = disks
        .iter()
        .map(|d| {
            let total = d.total_space();
            DiskUsage {
                mount_point: d.mount_point().to_string_lossy().to_string(),
                filesystem: d.file_system().to_string_lossy().to_string(),
                used_bytes: total.saturating_sub(d.available_space()),
                total_bytes: total,
            }
        })
        .collect();
    disk_rows.truncate(MAX_DISKS);

    let networks = Networks::new_with_refreshed_list();
    let mut interfaces: Vec<InterfaceInfo> = networks
        .iter()
        .map(|(name, data)| InterfaceInfo {
            name: name.clone(),
            addresses: data
                .ip_networks()
                .iter()
                .map(|ip| format!("{}/{}", ip.addr, ip.prefix))
                .collect(),
        })
        .collect();
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));

    SystemReport {
        hostname: System::host_name().unwrap_or_else(|| "Unknown".into()),
        os: System::long_os_version().unwrap_or_else(|| "Unknown".into()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".into()),
        uptime_seconds: System::uptime(),
        memory_used_bytes: sys.used_memory(),
        memory_total_bytes: sys.total_memory(),
        swap_used_bytes: sys.used_swap(),
        swap_total_bytes: sys.total_swap(),
        disks: disk_rows,
        interfaces,
    }
}

impl SystemReport {
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            format!("Hostname: {}", self.hostname),
            format!("OS: {}", self.os),
            format!("Kernel: {}", self.kernel),
            format!("Uptime: {}", format_uptime(self.uptime_seconds)),
            String::new(),
            "Memory Information:".to_string(),
            format!(
                "  Memory: {} / {}",
                format_bytes(self.memory_used_bytes),
                format_bytes(self.memory_total_bytes)
            ),
            format!(
                "  Swap:   {} / {}",
                format_bytes(self.swap_used_bytes),
                format_bytes(self.swap_total_bytes)
            ),
            String::new(),
            "Disk Information:".to_string(),
        ];
        if self.disks.is_empty() {
            out.push("  (none)".to_string());
        }
        for d in &self.disks {
            out.push(format!(
                "  {:<20} {:>10} / {:<10} {}",
                d.mount_point,
                format_bytes(d.used_bytes),
                format_bytes(d.total_bytes),
                d.filesystem
            ));
        }
        out.push(String::new());
        out.push("Network Interfaces:".to_string());
        if self.interfaces.is_empty() {
            out.push("  (none)".to_string());
        }
        for i in &self.interfaces {
            let addrs = if i.addresses.is_empty() {
                "-".to_string()
            } else {
                i.addresses.join(" ")
            };
            out.push(format!("  {:<16} {addrs}", i.name));
        }
        out
    }
}

/// Binary units, one decimal above bytes.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
