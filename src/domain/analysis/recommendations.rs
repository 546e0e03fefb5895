use crate::domain::entities::{Anomaly, MetricsSnapshot, Recommendation, RootCause};
use crate::domain::value_objects::{AnomalyKind, Platform, Priority};

use super::commands::{provider_for, CommandProvider, ShellCommand};

/// Swap usage above this adds a swap-specific step to memory advice
pub const SWAP_ADVICE_PERCENT: f64 = 20.0;

/// Builds remediation steps for anomalies. Output lists are ordered most
/// pressing first when built and are never re-sorted.
pub struct RecommendationEngine {
    commands: Box<dyn CommandProvider>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl RecommendationEngine {
    #[must_use]
    pub fn new(commands: Box<dyn CommandProvider>) -> Self {
        Self { commands }
    }

    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self::new(provider_for(platform))
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.commands.platform()
    }

    #[must_use]
    pub fn recommend(
        &self,
        anomaly: &Anomaly,
        _root_cause: &RootCause,
        snapshot: &MetricsSnapshot,
    ) -> Vec<Recommendation> {
        match anomaly.kind {
            AnomalyKind::CpuHigh => self.cpu_high(snapshot),
            AnomalyKind::CpuCritical => self.cpu_critical(snapshot),
            AnomalyKind::MemoryHigh => self.memory_high(snapshot),
            AnomalyKind::MemoryCritical => self.memory_critical(snapshot),
            AnomalyKind::MemoryLeakSuspected => Self::memory_leak(snapshot),
            AnomalyKind::SwapHigh => Self::swap_high(),
            AnomalyKind::SwapCritical => Self::swap_critical(),
            AnomalyKind::DiskFull | AnomalyKind::DiskSpaceLow => self.disk_full(),
            AnomalyKind::DiskCritical => self.disk_critical(snapshot),
            AnomalyKind::NetworkErrors => self.network_errors(),
            AnomalyKind::ZombieProcesses => self.zombie_processes(),
            AnomalyKind::ProcessCpuHigh | AnomalyKind::ProcessMemoryHigh => {
                self.process_hog(anomaly)
            }
            _ => Self::generic(anomaly),
        }
    }

    fn cmd(&self, command: ShellCommand) -> &'static str {
        self.commands.command(command)
    }

    fn cpu_high(&self, snapshot: &MetricsSnapshot) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        if let Some(top) = snapshot.top_cpu_processes().first() {
            recs.push(Recommendation::new(
                Priority::High,
                format!("Analyser le processus {}", top.name),
                format!("PID : {} | CPU : {:.1}%", top.pid, top.cpu_percent),
                "Identification de la cause",
                "2-5 minutes",
            ));
            recs.push(
                Recommendation::new(
                    Priority::Medium,
                    "Si le processus est non essentiel, l'arrêter",
                    self.commands.kill(top.pid),
                    "Libération immédiate du CPU",
                    "Instantané",
                )
                .with_warning("Vérifier l'importance du processus avant de l'arrêter"),
            );
        }
        recs.push(Recommendation::new(
            Priority::Medium,
            "Vérifier les tâches planifiées actives",
            self.cmd(ShellCommand::TaskList),
            "Identification des tâches automatiques",
            "3-5 minutes",
        ));
        recs.push(Recommendation::new(
            Priority::Low,
            "Optimiser les applications au démarrage",
            self.cmd(ShellCommand::StartupApps),
            "Amélioration long terme des performances",
            "10-15 minutes",
        ));
        recs
    }

    fn cpu_critical(&self, snapshot: &MetricsSnapshot) -> Vec<Recommendation> {
        let mut recs = self.cpu_high(snapshot);
        recs.insert(
            0,
            Recommendation::new(
                Priority::Urgent,
                "ACTION IMMÉDIATE : identifier et arrêter les processus critiques",
                self.cmd(ShellCommand::ProcessMonitor),
                "Éviter le gel du système",
                "Immédiat",
            )
            .with_warning("Système à risque de gel"),
        );
        recs
    }

    fn memory_high(&self, snapshot: &MetricsSnapshot) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        if let Some(top) = snapshot.top_memory_processes().first() {
            recs.push(Recommendation::new(
                Priority::Urgent,
                format!(
                    "Fermer les applications non essentielles, notamment {}",
                    top.name
                ),
                format!(
                    "RAM utilisée par {} : {:.1}%",
                    top.name, top.memory_percent
                ),
                "Libération immédiate de RAM",
                "Instantané",
            ));
        }
        recs.push(Recommendation::new(
            Priority::High,
            "Redémarrer les applications gourmandes en mémoire",
            self.cmd(ShellCommand::ProcessMonitor),
            "Libération des fuites mémoire potentielles",
            "1-2 minutes",
        ));
        let swap_percent = snapshot
            .memory
            .as_ref()
            .and_then(|m| m.swap)
            .map_or(0.0, |s| s.percent);
        if swap_percent > SWAP_ADVICE_PERCENT {
            recs.push(Recommendation::new(
                Priority::High,
                "Réduire l'utilisation du SWAP",
                "Fermer davantage d'applications",
                "Amélioration significative des performances",
                "2-3 minutes",
            ));
        }
        recs.push(Recommendation::new(
            Priority::Medium,
            "Vider le cache système",
            self.cmd(ShellCommand::ClearCache),
            "Libération de 500 MB à 2 GB",
            "5 minutes",
        ));
        let total_gb = snapshot.memory.as_ref().map_or(0.0, |m| m.total_gb);
        recs.push(Recommendation::new(
            Priority::Low,
            "Envisager une augmentation de la RAM",
            format!("RAM totale actuelle : {total_gb:.1} GB"),
            "Solution permanente",
            "N/A",
        ));
        recs
    }

    fn memory_critical(&self, snapshot: &MetricsSnapshot) -> Vec<Recommendation> {
        let mut recs = self.memory_high(snapshot);
        recs.insert(
            0,
            Recommendation::new(
                Priority::Urgent,
                "CRITIQUE : sauvegarder votre travail immédiatement",
                "Risque de crash système imminent",
                "Protection contre la perte de données",
                "Immédiat",
            )
            .with_warning("Système à risque de crash"),
        );
        recs
    }

    fn memory_leak(snapshot: &MetricsSnapshot) -> Vec<Recommendation> {
        let target = snapshot
            .top_memory_processes()
            .first()
            .map_or_else(
                || "Identifier via la surveillance continue".to_string(),
                |p| format!("Processus : {} (PID {})", p.name, p.pid),
            );
        vec![
            Recommendation::new(
                Priority::Urgent,
                "Redémarrer le processus suspecté de fuite mémoire",
                target,
                "Arrêt de la fuite mémoire",
                "Instantané",
            ),
            Recommendation::new(
                Priority::High,
                "Surveiller l'évolution de la mémoire après redémarrage",
                "itmon watch --interval 60",
                "Confirmation de la résolution",
                "30 minutes",
            ),
            Recommendation::new(
                Priority::Medium,
                "Vérifier les mises à jour de l'application",
                "Le bug peut être corrigé dans une version récente",
                "Solution permanente",
                "10-20 minutes",
            ),
        ]
    }

    fn swap_high() -> Vec<Recommendation> {
        vec![
            Recommendation::new(
                Priority::Urgent,
                "Réduire l'utilisation mémoire pour limiter le SWAP",
                "Fermer les applications non essentielles",
                "Amélioration significative des performances",
                "2-3 minutes",
            ),
            Recommendation::new(
                Priority::High,
                "Redémarrer les applications majeures",
                "Pour libérer la mémoire fragmentée",
                "Réduction de l'utilisation SWAP",
                "3-5 minutes",
            ),
        ]
    }

    fn swap_critical() -> Vec<Recommendation> {
        let mut recs = Self::swap_high();
        recs.insert(
            0,
            Recommendation::new(
                Priority::Urgent,
                "CRITIQUE : libérer de la mémoire IMMÉDIATEMENT",
                "Fermer les applications les plus gourmandes",
                "Éviter l'effondrement des performances",
                "Immédiat",
            )
            .with_warning("Système à risque de blocage"),
        );
        recs
    }

    fn disk_full(&self) -> Vec<Recommendation> {
        vec![
            Recommendation::new(
                Priority::Urgent,
                "Nettoyer les fichiers temporaires",
                self.cmd(ShellCommand::DiskCleanup),
                "Libération de 1-5 GB",
                "5-10 minutes",
            ),
            Recommendation::new(
                Priority::Urgent,
                "Vider la corbeille",
                self.cmd(ShellCommand::EmptyTrash),
                "Libération immédiate d'espace",
                "1 minute",
            ),
            Recommendation::new(
                Priority::High,
                "Identifier les fichiers volumineux",
                self.cmd(ShellCommand::FindLargeFiles),
                "Localisation des gros fichiers à supprimer",
                "5-10 minutes",
            ),
            Recommendation::new(
                Priority::High,
                "Supprimer les anciens logs système",
                self.cmd(ShellCommand::CleanLogs),
                "Libération de 500 MB à 5 GB",
                "3-5 minutes",
            ),
            Recommendation::new(
                Priority::Medium,
                "Désinstaller les applications inutilisées",
                self.cmd(ShellCommand::UninstallApps),
                "Libération significative d'espace",
                "15-30 minutes",
            ),
            Recommendation::new(
                Priority::Low,
                "Configurer un nettoyage automatique",
                "Planifier une tâche de nettoyage hebdomadaire",
                "Prévention long terme",
                "10 minutes",
            ),
        ]
    }

    fn disk_critical(&self, snapshot: &MetricsSnapshot) -> Vec<Recommendation> {
        let free_gb = snapshot.disk.as_ref().map_or(0.0, |d| d.free_gb);
        let mut recs = self.disk_full();
        recs.insert(
            0,
            Recommendation::new(
                Priority::Urgent,
                "CRITIQUE : libérer de l'espace IMMÉDIATEMENT",
                format!("Espace libre : {free_gb:.2} GB"),
                "Éviter le blocage du système",
                "Immédiat",
            )
            .with_warning("Risque de dysfonctionnement système"),
        );
        recs
    }

    fn network_errors(&self) -> Vec<Recommendation> {
        vec![
            Recommendation::new(
                Priority::High,
                "Vérifier les câbles réseau",
                "Contrôle visuel des connexions physiques",
                "Résolution si problème matériel",
                "2-3 minutes",
            ),
            Recommendation::new(
                Priority::High,
                "Redémarrer l'interface réseau",
                self.cmd(ShellCommand::NetworkRestart),
                "Réinitialisation de la connexion",
                "1-2 minutes",
            ),
            Recommendation::new(
                Priority::Medium,
                "Vérifier la configuration réseau",
                self.cmd(ShellCommand::NetworkConfig),
                "Identification d'erreurs de configuration",
                "5 minutes",
            ),
            Recommendation::new(
                Priority::Low,
                "Mettre à jour les pilotes réseau",
                "Gestionnaire de périphériques > Cartes réseau",
                "Résolution de bugs connus",
                "10-15 minutes",
            ),
        ]
    }

    fn zombie_processes(&self) -> Vec<Recommendation> {
        vec![
            Recommendation::new(
                Priority::Medium,
                "Identifier et redémarrer les processus parents",
                self.cmd(ShellCommand::ListZombies),
                "Nettoyage des zombies",
                "5 minutes",
            ),
            Recommendation::new(
                Priority::Low,
                "Si le problème persiste, redémarrer le système",
                self.cmd(ShellCommand::Reboot),
                "Nettoyage complet",
                "5-10 minutes",
            ),
        ]
    }

    /// Targets the offending process when the anomaly names one
    fn process_hog(&self, anomaly: &Anomaly) -> Vec<Recommendation> {
        let Some(process) = &anomaly.process else {
            return Self::generic(anomaly);
        };
        vec![
            Recommendation::new(
                Priority::High,
                format!("Analyser le processus {}", process.name),
                format!("PID : {} | {:.1}%", process.pid, anomaly.value),
                "Identification de la cause",
                "2-5 minutes",
            ),
            Recommendation::new(
                Priority::Medium,
                format!("Arrêter {} s'il n'est pas essentiel", process.name),
                self.commands.kill(process.pid),
                "Libération immédiate des ressources",
                "Instantané",
            )
            .with_warning("Vérifier l'importance du processus avant de l'arrêter"),
            Recommendation::new(
                Priority::Low,
                "Surveiller l'évolution",
                "itmon top",
                "Détection si le problème persiste",
                "Continu",
            ),
        ]
    }

    fn generic(anomaly: &Anomaly) -> Vec<Recommendation> {
        vec![
            Recommendation::new(
                Priority::Medium,
                format!("Analyser l'anomalie : {}", anomaly.message),
                "Consulter les logs système pour plus d'informations",
                "Compréhension du problème",
                "5-10 minutes",
            ),
            Recommendation::new(
                Priority::Low,
                "Surveiller l'évolution",
                "itmon watch",
                "Détection si le problème persiste",
                "Continu",
            ),
        ]
    }
}
