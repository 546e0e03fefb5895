use crate::domain::value_objects::Platform;

/// Remediation commands whose text differs per OS family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellCommand {
    ProcessMonitor,
    TaskList,
    StartupApps,
    ClearCache,
    DiskCleanup,
    EmptyTrash,
    FindLargeFiles,
    CleanLogs,
    UninstallApps,
    NetworkRestart,
    NetworkConfig,
    ListZombies,
    Reboot,
}

/// Source of OS-specific command strings for recommendations
pub trait CommandProvider: Send + Sync {
    fn platform(&self) -> Platform;

    fn command(&self, command: ShellCommand) -> &'static str;

    /// Forcefully terminates `pid`
    fn kill(&self, pid: u32) -> String;
}

pub struct WindowsCommands;

impl CommandProvider for WindowsCommands {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn command(&self, command: ShellCommand) -> &'static str {
        match command {
            ShellCommand::ProcessMonitor => "taskmgr",
            ShellCommand::TaskList => "schtasks /query",
            ShellCommand::StartupApps => "Gestionnaire de tâches > Démarrage",
            ShellCommand::ClearCache => "Cleanmgr.exe",
            ShellCommand::DiskCleanup => "cleanmgr /sagerun:1",
            ShellCommand::EmptyTrash => "Clic droit sur Corbeille > Vider la corbeille",
            ShellCommand::FindLargeFiles => "WinDirStat ou TreeSize Free",
            ShellCommand::CleanLogs => "Supprimer les fichiers dans C:\\Windows\\Logs",
            ShellCommand::UninstallApps => "Panneau de configuration > Programmes",
            ShellCommand::NetworkRestart => "ipconfig /release && ipconfig /renew",
            ShellCommand::NetworkConfig => "ipconfig /all",
            ShellCommand::ListZombies => "Gestionnaire de tâches",
            ShellCommand::Reboot => "shutdown /r",
        }
    }

    fn kill(&self, pid: u32) -> String {
        format!("taskkill /PID {pid} /F")
    }
}

pub struct MacCommands;

impl CommandProvider for MacCommands {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn command(&self, command: ShellCommand) -> &'static str {
        match command {
            ShellCommand::ProcessMonitor => "top -o cpu",
            ShellCommand::TaskList => "crontab -l && launchctl list",
            ShellCommand::StartupApps => "launchctl list",
            ShellCommand::ClearCache => "sudo purge",
            ShellCommand::DiskCleanup => "rm -rf ~/Library/Caches/*",
            ShellCommand::EmptyTrash => "rm -rf ~/.Trash/*",
            ShellCommand::FindLargeFiles => "du -h -d 1 / 2>/dev/null | sort -hr | head -20",
            ShellCommand::CleanLogs => "sudo find /var/log -name '*.log' -mtime +30 -delete",
            ShellCommand::UninstallApps => "ls /Applications",
            ShellCommand::NetworkRestart => "sudo ifconfig en0 down && sudo ifconfig en0 up",
            ShellCommand::NetworkConfig => "ifconfig -a",
            ShellCommand::ListZombies => "ps -axo pid,ppid,stat,comm | awk '$3 ~ /Z/'",
            ShellCommand::Reboot => "sudo reboot",
        }
    }

    fn kill(&self, pid: u32) -> String {
        format!("kill -9 {pid}")
    }
}

/// Linux and every other Unix
pub struct UnixCommands;

impl CommandProvider for UnixCommands {
    fn platform(&self) -> Platform {
        Platform::Unix
    }

    fn command(&self, command: ShellCommand) -> &'static str {
        match command {
            ShellCommand::ProcessMonitor => "top -o %CPU",
            ShellCommand::TaskList => "crontab -l && systemctl list-timers",
            ShellCommand::StartupApps => "systemctl list-unit-files",
            ShellCommand::ClearCache => "sudo sh -c 'echo 3 > /proc/sys/vm/drop_caches'",
            ShellCommand::DiskCleanup => "sudo apt-get clean && sudo apt-get autoremove",
            ShellCommand::EmptyTrash => "rm -rf ~/.local/share/Trash/*",
            ShellCommand::FindLargeFiles => "du -h --max-depth=1 / 2>/dev/null | sort -hr | head -20",
            ShellCommand::CleanLogs => "sudo find /var/log -name '*.log' -mtime +30 -delete",
            ShellCommand::UninstallApps => "apt list --installed",
            ShellCommand::NetworkRestart => "sudo systemctl restart NetworkManager",
            ShellCommand::NetworkConfig => "ip addr show",
            ShellCommand::ListZombies => "ps -eo pid,ppid,stat,comm | awk '$3 ~ /Z/'",
            ShellCommand::Reboot => "sudo reboot",
        }
    }

    fn kill(&self, pid: u32) -> String {
        format!("kill -9 {pid}")
    }
}

#[must_use]
pub fn provider_for(platform: Platform) -> Box<dyn CommandProvider> {
    match platform {
        Platform::Windows => Box::new(WindowsCommands),
        Platform::MacOs => Box::new(MacCommands),
        Platform::Unix => Box::new(UnixCommands),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_commands() {
        assert_eq!(WindowsCommands.kill(42), "taskkill /PID 42 /F");
        assert_eq!(MacCommands.kill(42), "kill -9 42");
        assert_eq!(UnixCommands.kill(42), "kill -9 42");
    }

    #[test]
    fn cache_clearing_differs_per_platform() {
        assert_eq!(WindowsCommands.command(ShellCommand::ClearCache), "Cleanmgr.exe");
        assert_eq!(MacCommands.command(ShellCommand::ClearCache), "sudo purge");
        assert!(UnixCommands
            .command(ShellCommand::ClearCache)
            .contains("drop_caches"));
    }

    #[test]
    fn provider_for_matches_platform() {
        for platform in [Platform::Windows, Platform::MacOs, Platform::Unix] {
            assert_eq!(provider_for(platform).platform(), platform);
        }
    }

    #[test]
    fn network_config() {
        assert_eq!(WindowsCommands.command(ShellCommand::NetworkConfig), "ipconfig /all");
        assert_eq!(UnixCommands.command(ShellCommand::NetworkConfig), "ip addr show");
    }
}
