use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// What selecting an entry does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a shell command line as a foreground process.
    External(String),
    ShowHelp,
    ShowSystemInfo,
    Quit,
}

impl Action {
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Action::External(_))
    }

    /// Command line for external actions, empty for built-ins.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Action::External(cmd) => cmd,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub title: String,
    pub description: String,
    pub action: Action,
    pub enabled: bool,
}

impl ActionItem {
    #[must_use]
    pub fn external(title: &str, description: &str, cmd: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            action: Action::External(cmd.to_string()),
            enabled: true,
        }
    }

    #[must_use]
    pub fn builtin(title: &str, description: &str, action: Action) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            action,
            enabled: true,
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        self.action.command()
    }
}

/// The compiled-in catalog.
#[must_use]
pub fn load() -> Vec<ActionItem> {
    vec![
        ActionItem::external(
            "System Status",
            "View system health and service status",
            "/opt/noc-raven/bin/health-check.sh",
        ),
        ActionItem::external(
            "Network Interface Status",
            "Show network interface information",
            "/opt/noc-raven/bin/network-tools.sh interface-status",
        ),
        ActionItem::external(
            "Port Scan",
            "Check telemetry port availability",
            "/opt/noc-raven/bin/network-tools.sh port-scan",
        ),
        ActionItem::external(
            "Test NetFlow Reception",
            "Monitor NetFlow traffic for 10 seconds",
            "/opt/noc-raven/bin/network-tools.sh flow-test",
        ),
        ActionItem::external(
            "Test Syslog Reception",
            "Monitor Syslog traffic for 10 seconds",
            "/opt/noc-raven/bin/network-tools.sh syslog-test",
        ),
        ActionItem::external(
            "Service Status",
            "Show status of all NoC Raven services",
            "supervisorctl status",
        ),
        ActionItem::external(
            "Restart All Services",
            "Restart all telemetry collection services",
            "supervisorctl restart all",
        ),
        ActionItem::external(
            "Start Web Interface",
            "Start the web management interface",
            "systemctl start nginx",
        ),
        ActionItem::external(
            "Stop Web Interface",
            "Stop the web management interface",
            "systemctl stop nginx",
        ),
        ActionItem::external(
            "View Recent Logs",
            "Show recent system and service logs",
            "tail -50 /var/log/noc-raven/*.log",
        ),
        ActionItem::external(
            "Show System Resources",
            "Display CPU, memory, and disk usage",
            "free -h && df -h && uptime",
        ),
        ActionItem::external(
            "Show Process List",
            "List running NoC Raven processes",
            "ps aux | grep -E '(goflow2|fluent-bit|vector|telegraf|nginx)'",
        ),
        ActionItem::external(
            "Edit GoFlow2 Config",
            "Edit NetFlow collector configuration",
            "nano /opt/noc-raven/config/goflow2.yml",
        ),
        ActionItem::external(
            "Edit Vector Config",
            "Edit data pipeline configuration",
            "nano /etc/vector/vector.toml",
        ),
        ActionItem::external(
            "Boot Manager",
            "Run system initialization sequence",
            "/opt/noc-raven/bin/boot-manager.sh",
        ),
        ActionItem::builtin(
            "System Information",
            "Show detailed system information",
            Action::ShowSystemInfo,
        ),
        ActionItem::builtin("Help", "Show help and documentation", Action::ShowHelp),
        ActionItem::builtin("Exit", "Exit NoC Raven terminal menu", Action::Quit),
    ]
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinKind {
    Help,
    SystemInfo,
    Quit,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ItemDef {
    pub title: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, alias = "command")]
    pub cmd: Option<String>,
    #[serde(default)]
    pub builtin: Option<BuiltinKind>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    #[serde(default, alias = "menu")]
    pub items: Vec<ItemDef>,
}

/// Check raw file entries before they become `ActionItem`s.
#[must_use]
pub fn validate_entries(entries: &[ItemDef]) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut dups: Vec<String> = Vec::new();

    let enabled: Vec<&ItemDef> = entries.iter().filter(|s| s.enabled).collect();
    if enabled.is_empty() {
        issues.push("Catalog has no enabled entries".to_string());
    }
    for entry in enabled {
        let title = entry.title.trim();
        if title.is_empty() {
            issues.push("Catalog entry with an empty title".to_string());
            continue;
        }
        if !seen.insert(title) && !dups.iter().any(|d| d == title) {
            dups.push(title.to_string());
        }
        match (&entry.cmd, entry.builtin) {
            (Some(_), Some(_)) => issues.push(format!(
                "Entry '{title}' cannot specify both 'cmd' and 'builtin'"
            )),
            (None, None) => issues.push(format!(
                "Entry '{title}' has no action ('cmd' or 'builtin')"
            )),
            (Some(cmd), None) if cmd.trim().is_empty() => {
                issues.push(format!("Entry '{title}' has an empty command"));
            }
            _ => {}
        }
    }

    if !dups.is_empty() {
        dups.sort_unstable();
        issues.push(format!("Duplicate titles: {}", dups.join(", ")));
    }
    issues
}

/// Check an already-built catalog: non-empty, unique titles, no blank commands.
#[must_use]
pub fn validate_catalog(items: &[ActionItem]) -> Vec<String> {
    let entries: Vec<ItemDef> = items
        .iter()
        .map(|it| ItemDef {
            title: it.title.clone(),
            description: it.description.clone(),
            cmd: match &it.action {
                Action::External(cmd) => Some(cmd.clone()),
                _ => None,
            },
            builtin: match it.action {
                Action::External(_) => None,
                Action::ShowHelp => Some(BuiltinKind::Help),
                Action::ShowSystemInfo => Some(BuiltinKind::SystemInfo),
                Action::Quit => Some(BuiltinKind::Quit),
            },
            enabled: it.enabled,
        })
        .collect();
    validate_entries(&entries)
}

fn into_item(entry: ItemDef) -> ActionItem {
    let action = match (entry.builtin, entry.cmd) {
        (Some(BuiltinKind::Help), _) => Action::ShowHelp,
        (Some(BuiltinKind::SystemInfo), _) => Action::ShowSystemInfo,
        (Some(BuiltinKind::Quit), _) => Action::Quit,
        (None, cmd) => Action::External(cmd.unwrap_or_default()),
    };
    ActionItem {
        title: entry.title.trim().to_string(),
        description: entry.description,
        action,
        enabled: entry.enabled,
    }
}

/// Parse a catalog file by extension (yaml/yml, json, otherwise toml).
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn parse_catalog_file(path: &Path) -> Result<CatalogFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read catalog {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let parsed = match ext.as_deref() {
        Some("yaml" | "yml") => serde_yaml::from_str::<CatalogFile>(&contents)?,
        Some("json") => serde_json::from_str::<CatalogFile>(&contents)?,
        _ => toml::from_str::<CatalogFile>(&contents)?,
    };
    Ok(parsed)
}

/// Loads a catalog from a file, dropping disabled entries.
///
/// # Errors
/// Returns error if the file cannot be parsed or fails validation.
pub fn load_catalog_file(path: &Path) -> Result<Vec<ActionItem>> {
    let file = parse_catalog_file(path)?;
    let issues = validate_entries(&file.items);
    if !issues.is_empty() {
        return Err(anyhow!(
            "invalid catalog {}: {}",
            path.display(),
            issues.join("; ")
        ));
    }
    Ok(file
        .items
        .into_iter()
        .filter(|s| s.enabled)
        .map(into_item)
        .collect())
}
