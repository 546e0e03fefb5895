//! Rule-based explanation of anomalies. Each resolver reads sibling metrics
//! from the same snapshot; anything absent is treated as zero or empty.

use crate::domain::entities::{Anomaly, MetricsSnapshot, ProcessEntry, RootCause};
use crate::domain::value_objects::AnomalyKind;

/// Partitions above this usage are listed in disk explanations
pub const PARTITION_REPORT_PERCENT: f64 = 85.0;

/// Resolves the root cause of `anomaly` against the snapshot it came from.
#[must_use]
pub fn resolve(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    match anomaly.kind {
        AnomalyKind::CpuHigh | AnomalyKind::CpuCritical => cpu_high(anomaly, snapshot),
        AnomalyKind::CpuSpike => cpu_spike(anomaly, snapshot),
        AnomalyKind::MemoryHigh | AnomalyKind::MemoryCritical => memory_high(anomaly, snapshot),
        AnomalyKind::MemoryLeakSuspected => memory_leak(anomaly, snapshot),
        AnomalyKind::DiskFull | AnomalyKind::DiskCritical => disk_full(anomaly, snapshot),
        AnomalyKind::NetworkErrors => network_errors(anomaly, snapshot),
        AnomalyKind::ZombieProcesses => zombie_processes(anomaly),
        AnomalyKind::ProcessCpuHigh | AnomalyKind::ProcessMemoryHigh => process_hog(anomaly),
        AnomalyKind::SuspiciousProcess => suspicious_process(anomaly),
        _ => generic(anomaly),
    }
}

fn timeline(stages: &[&str]) -> Vec<String> {
    stages.iter().map(|s| (*s).to_string()).collect()
}

fn names(processes: &[ProcessEntry], limit: usize) -> Vec<String> {
    processes.iter().take(limit).map(|p| p.name.clone()).collect()
}

fn cpu_high(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    let top: Vec<&ProcessEntry> = snapshot.top_cpu_processes().iter().take(5).collect();
    let (cause, details) = if top.is_empty() {
        (
            "Charge CPU globale élevée".to_string(),
            "Aucune information de processus disponible".to_string(),
        )
    } else {
        let leaders: Vec<&str> = top.iter().take(3).map(|p| p.name.as_str()).collect();
        (
            format!("{} processus consomment le plus de CPU", top.len()),
            format!("Top processus : {}", leaders.join(", ")),
        )
    };
    RootCause {
        kind: "cpu_high".to_string(),
        cause,
        details,
        affected_components: top
            .iter()
            .map(|p| format!("{} (PID {}, {:.1}%)", p.name, p.pid, p.cpu_percent))
            .collect(),
        severity_factors: vec![
            format!("CPU global : {:.1}%", anomaly.value),
            format!("Seuil dépassé de {:.1}%", anomaly.value - anomaly.threshold),
        ],
        timeline: timeline(&[
            "Augmentation progressive de la charge CPU",
            "Processus identifiés comme responsables",
            "Impact sur les performances système",
        ]),
    }
}

fn cpu_spike(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    RootCause {
        kind: "cpu_spike".to_string(),
        cause: "Pic CPU soudain détecté".to_string(),
        details: "Processus récemment lancé ou tâche planifiée".to_string(),
        affected_components: names(snapshot.top_cpu_processes(), 3),
        severity_factors: vec![
            format!("Variation brusque : {:.1}%", anomaly.value),
            "Comportement anormal détecté".to_string(),
        ],
        timeline: timeline(&[
            "État CPU normal",
            "Pic soudain d'utilisation",
            "Processus suspect identifié",
        ]),
    }
}

fn memory_high(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    let top: Vec<&ProcessEntry> = snapshot.top_memory_processes().iter().take(5).collect();
    let swap_percent = snapshot
        .memory
        .as_ref()
        .and_then(|m| m.swap)
        .map_or(0.0, |s| s.percent);
    let available_gb = snapshot.memory.as_ref().map_or(0.0, |m| m.available_gb);

    let mut causes = Vec::new();
    if swap_percent > 20.0 {
        causes.push("Utilisation du SWAP indiquant une RAM insuffisante".to_string());
    }
    if let Some(first) = top.first().filter(|p| p.memory_percent > 30.0) {
        causes.push(format!(
            "Le processus {} consomme {:.1}% de la RAM",
            first.name, first.memory_percent
        ));
    }
    let cause = if causes.is_empty() {
        "Consommation mémoire excessive".to_string()
    } else {
        causes.join(" | ")
    };

    RootCause {
        kind: "memory_high".to_string(),
        cause,
        details: format!("RAM disponible : {available_gb:.2} GB"),
        affected_components: top
            .iter()
            .map(|p| format!("{} (PID {}, {:.1}%)", p.name, p.pid, p.memory_percent))
            .collect(),
        severity_factors: vec![
            format!("RAM utilisée : {:.1}%", anomaly.value),
            format!("SWAP utilisé : {swap_percent:.1}%"),
            format!("Mémoire disponible : {available_gb:.2} GB"),
        ],
        timeline: vec![
            "Augmentation progressive de l'utilisation RAM".to_string(),
            if swap_percent > 0.0 {
                "Début d'utilisation du SWAP".to_string()
            } else {
                "RAM proche de la saturation".to_string()
            },
            "Performances dégradées".to_string(),
        ],
    }
}

fn memory_leak(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    let used_percent = snapshot.memory_percent().unwrap_or(0.0);
    RootCause {
        kind: "memory_leak".to_string(),
        cause: "Fuite mémoire suspectée : la mémoire disponible s'épuise".to_string(),
        details: "Processus ne libérant pas la mémoire allouée".to_string(),
        affected_components: names(snapshot.top_memory_processes(), 3),
        severity_factors: vec![
            format!("RAM actuelle : {used_percent:.1}%"),
            format!("Mémoire disponible : {:.2} GB", anomaly.value),
        ],
        timeline: timeline(&[
            "Utilisation mémoire initiale normale",
            "Augmentation continue sur plusieurs cycles",
            "Fuite mémoire probable identifiée",
        ]),
    }
}

fn disk_full(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    let free_gb = snapshot.disk.as_ref().map_or(0.0, |d| d.free_gb);
    let mut details = vec![format!("Espace libre : {free_gb:.2} GB")];
    if let Some(disk) = &snapshot.disk {
        details.extend(
            disk.partitions
                .iter()
                .filter(|(_, p)| p.percent > PARTITION_REPORT_PERCENT)
                .map(|(mount, p)| format!("{mount} : {:.1}% utilisé", p.percent)),
        );
    }
    RootCause {
        kind: "disk_full".to_string(),
        cause: "Espace disque insuffisant".to_string(),
        details: details.join(" | "),
        affected_components: vec![
            "Système de fichiers".to_string(),
            "Applications nécessitant de l'espace".to_string(),
            "Fichiers temporaires et logs".to_string(),
        ],
        severity_factors: vec![
            format!("Disque utilisé : {:.1}%", anomaly.value),
            format!("Espace libre : {free_gb:.2} GB"),
            "Risque de dysfonctionnement système".to_string(),
        ],
        timeline: timeline(&[
            "Accumulation progressive de données",
            "Seuil d'alerte dépassé",
            "Risque imminent de saturation",
        ]),
    }
}

fn network_errors(anomaly: &Anomaly, snapshot: &MetricsSnapshot) -> RootCause {
    let net = snapshot.network.unwrap_or_default();
    RootCause {
        kind: "network_errors".to_string(),
        cause: "Erreurs de transmission réseau détectées".to_string(),
        details: format!(
            "Erreurs entrée : {}, erreurs sortie : {}",
            net.err_in, net.err_out
        ),
        affected_components: vec![
            "Interfaces réseau".to_string(),
            "Connexions actives".to_string(),
            "Applications réseau".to_string(),
        ],
        severity_factors: vec![
            format!("Total erreurs : {}", anomaly.value),
            format!(
                "Paquets perdus : {}",
                net.drop_in.saturating_add(net.drop_out)
            ),
        ],
        timeline: timeline(&[
            "Connexions réseau fonctionnelles",
            "Apparition d'erreurs de transmission",
            "Dégradation de la qualité réseau",
        ]),
    }
}

fn zombie_processes(anomaly: &Anomaly) -> RootCause {
    RootCause {
        kind: "zombie_processes".to_string(),
        cause: "Processus zombies non nettoyés".to_string(),
        details: format!("{} processus zombies détectés", anomaly.value),
        affected_components: vec![
            "Gestion des processus système".to_string(),
            "Processus parents défaillants".to_string(),
        ],
        severity_factors: vec![
            format!("Nombre de zombies : {}", anomaly.value),
            "Impact sur la stabilité système".to_string(),
        ],
        timeline: timeline(&[
            "Terminaison de processus enfants",
            "Processus parent ne récupère pas le statut",
            "Accumulation de processus zombies",
        ]),
    }
}

fn process_hog(anomaly: &Anomaly) -> RootCause {
    let mut affected = vec!["Performances système globales".to_string()];
    if let Some(process) = &anomaly.process {
        affected.insert(0, process.to_string());
    }
    RootCause {
        kind: "process_hog".to_string(),
        cause: "Processus consommant excessivement des ressources".to_string(),
        details: anomaly.message.clone(),
        affected_components: affected,
        severity_factors: vec![
            format!("Valeur : {:.1}%", anomaly.value),
            "Impact significatif sur les autres processus".to_string(),
        ],
        timeline: timeline(&[
            "Lancement ou activation du processus",
            "Consommation excessive de ressources",
            "Dégradation des performances",
        ]),
    }
}

fn suspicious_process(anomaly: &Anomaly) -> RootCause {
    RootCause {
        kind: "suspicious_process".to_string(),
        cause: "Nom de processus associé au minage de cryptomonnaie".to_string(),
        details: anomaly.message.clone(),
        affected_components: anomaly
            .process
            .as_ref()
            .map_or_else(|| vec!["Processus inconnu".to_string()], |p| vec![p.to_string()]),
        severity_factors: vec![
            "Correspondance avec une liste de noms suspects".to_string(),
            "Consommation de ressources potentiellement non autorisée".to_string(),
        ],
        timeline: timeline(&[
            "Démarrage du processus",
            "Présence dans les processus les plus actifs",
            "Nom suspect identifié",
        ]),
    }
}

fn generic(anomaly: &Anomaly) -> RootCause {
    RootCause {
        kind: anomaly.kind.as_str().to_string(),
        cause: anomaly.message.clone(),
        details: format!("Valeur : {}", anomaly.value),
        affected_components: vec!["Système".to_string()],
        severity_factors: vec![
            format!("Sévérité : {}", anomaly.severity),
            format!("Catégorie : {}", anomaly.category),
        ],
        timeline: timeline(&["Détection de l'anomalie", "Analyse en cours"]),
    }
}
