use crate::domain::entities::{Anomaly, MetricsSnapshot};
use crate::domain::value_objects::{AnomalyKind, Severity, ThresholdSet};

use super::{count, Rule};

pub const DROPPED_PACKETS_LIMIT: u64 = 100;
/// MB/s in either direction
pub const BANDWIDTH_LIMIT_MB_S: f64 = 100.0;
pub const CONNECTIONS_LIMIT: u64 = 1000;
pub const TIME_WAIT_LIMIT: u64 = 500;

pub struct NetworkErrorsRule;

impl Rule for NetworkErrorsRule {
    fn name(&self) -> &'static str {
        "network_errors"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(net) = &snapshot.network else {
            return vec![];
        };
        let total = net.err_in.saturating_add(net.err_out);
        let bound = thresholds.network_errors.warning;
        if count(total) > bound {
            vec![Anomaly::new(
                AnomalyKind::NetworkErrors,
                Severity::Warning,
                count(total),
                bound,
                format!(
                    "Erreurs réseau détectées : {total} erreurs (↓{} ↑{}, seuil {bound:.0})",
                    net.err_in, net.err_out
                ),
            )]
        } else {
            vec![]
        }
    }
}

pub struct PacketLossRule;

impl Rule for PacketLossRule {
    fn name(&self) -> &'static str {
        "network_packet_loss"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(net) = &snapshot.network else {
            return vec![];
        };
        let total = net.drop_in.saturating_add(net.drop_out);
        if total > DROPPED_PACKETS_LIMIT {
            vec![Anomaly::new(
                AnomalyKind::NetworkPacketLoss,
                Severity::Warning,
                count(total),
                count(DROPPED_PACKETS_LIMIT),
                format!(
                    "Paquets réseau perdus : {total} paquets (↓{} ↑{}, seuil {DROPPED_PACKETS_LIMIT})",
                    net.drop_in, net.drop_out
                ),
            )]
        } else {
            vec![]
        }
    }
}

pub struct BandwidthRule;

impl Rule for BandwidthRule {
    fn name(&self) -> &'static str {
        "network_bandwidth"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(net) = &snapshot.network else {
            return vec![];
        };
        if net.sent_mb_s > BANDWIDTH_LIMIT_MB_S || net.recv_mb_s > BANDWIDTH_LIMIT_MB_S {
            vec![Anomaly::new(
                AnomalyKind::NetworkBandwidthHigh,
                Severity::Info,
                net.sent_mb_s.max(net.recv_mb_s),
                BANDWIDTH_LIMIT_MB_S,
                format!(
                    "Bande passante élevée : ↓{:.2} MB/s ↑{:.2} MB/s",
                    net.recv_mb_s, net.sent_mb_s
                ),
            )]
        } else {
            vec![]
        }
    }
}

/// Open socket count and sockets lingering in TIME_WAIT
pub struct ConnectionsRule;

impl Rule for ConnectionsRule {
    fn name(&self) -> &'static str {
        "network_connections"
    }

    fn evaluate(&self, snapshot: &MetricsSnapshot, _thresholds: &ThresholdSet) -> Vec<Anomaly> {
        let Some(net) = &snapshot.network else {
            return vec![];
        };
        let mut anomalies = Vec::new();
        if net.connections_count > CONNECTIONS_LIMIT {
            anomalies.push(Anomaly::new(
                AnomalyKind::NetworkConnectionsHigh,
                Severity::Warning,
                count(net.connections_count),
                count(CONNECTIONS_LIMIT),
                format!(
                    "Nombre élevé de connexions réseau : {} (seuil {CONNECTIONS_LIMIT})",
                    net.connections_count
                ),
            ));
        }
        if net.time_wait > TIME_WAIT_LIMIT {
            anomalies.push(Anomaly::new(
                AnomalyKind::NetworkTimeWaitHigh,
                Severity::Info,
                count(net.time_wait),
                count(TIME_WAIT_LIMIT),
                format!(
                    "Nombre élevé de connexions TIME_WAIT : {} (seuil {TIME_WAIT_LIMIT})",
                    net.time_wait
                ),
            ));
        }
        anomalies
    }
}
