//! Batch classification of scanned hosts and the per-host report written to stdout.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::{JoinError, JoinHandle};

use crate::classifier::{ClassificationResult, Classifier, MatchedBy};
use crate::evidence::HostEvidence;
use crate::oui::OuiTable;

/// Classification of one host, with the OUI vendor hint kept alongside
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub ip_addr: String,
    pub mac_addr: Option<String>,
    pub mac_vendor: Option<String>,
    #[serde(flatten)]
    pub classification: ClassificationResult,
}

/// Count of reports per evidence category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub fingerprint: usize,
    pub port: usize,
    pub none: usize,
}

impl Summary {
    pub fn from_reports(reports: &[DeviceReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match report.classification.matched_by {
                MatchedBy::Fingerprint => summary.fingerprint += 1,
                MatchedBy::Port => summary.port += 1,
                MatchedBy::None => summary.none += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.fingerprint + self.port + self.none
    }
}

pub fn classify_host(
    classifier: &Classifier,
    oui: Option<&OuiTable>,
    host: HostEvidence,
) -> DeviceReport {
    let classification = classifier.classify(&host.evidence);
    let mac_vendor = host
        .mac_addr
        .as_deref()
        .and_then(|mac| oui.and_then(|table| table.lookup(mac)))
        .map(str::to_string);

    DeviceReport {
        ip_addr: host.ip_addr,
        mac_addr: host.mac_addr,
        mac_vendor,
        classification,
    }
}

/// Classify every host concurrently against one shared classifier.
/// Reports come back in input order; a failed task aborts the batch.
pub async fn classify_hosts(
    classifier: Arc<Classifier>,
    oui: Option<Arc<OuiTable>>,
    hosts: Vec<HostEvidence>,
) -> Result<Vec<DeviceReport>, JoinError> {
    let handles = hosts
        .into_iter()
        .map(|host| {
            let classifier = Arc::clone(&classifier);
            let oui = oui.clone();
            tokio::task::spawn_blocking(move || classify_host(&classifier, oui.as_deref(), host))
        })
        .collect();

    join_in_order(handles).await
}

async fn join_in_order<T>(handles: Vec<JoinHandle<T>>) -> Result<Vec<T>, JoinError> {
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::Evidence;
    use crate::rules::{FingerprintRuleEntry, PortRoleEntry};

    fn test_classifier() -> Classifier {
        Classifier::from_entries(
            vec![PortRoleEntry::new("9100", "printer", "Printer")],
            vec![FingerprintRuleEntry::new("(?i)synology", "Synology", "NAS")],
        )
        .unwrap()
    }

    fn host(ip: &str, mac: Option<&str>, evidence: Evidence) -> HostEvidence {
        HostEvidence {
            ip_addr: ip.to_string(),
            mac_addr: mac.map(str::to_string),
            evidence,
        }
    }

    #[test]
    fn test_classify_host_with_oui_hint() {
        let classifier = test_classifier();
        let oui = OuiTable::parse("00:11:32\tSynology Incorporated\n");
        let report = classify_host(
            &classifier,
            Some(&oui),
            host(
                "10.0.0.20",
                Some("00:11:32:aa:bb:cc"),
                Evidence::new().with_artifact("http_body", "DiskStation - Synology"),
            ),
        );

        assert_eq!(report.mac_vendor.as_deref(), Some("Synology Incorporated"));
        assert_eq!(report.classification.vendor.as_deref(), Some("Synology"));
        assert_eq!(report.classification.matched_by, MatchedBy::Fingerprint);
    }

    #[test]
    fn test_oui_hint_does_not_change_classification() {
        let classifier = test_classifier();
        let oui = OuiTable::parse("00:11:32\tSynology Incorporated\n");
        let report = classify_host(
            &classifier,
            Some(&oui),
            host("10.0.0.21", Some("00:11:32:00:00:01"), Evidence::new()),
        );

        assert_eq!(report.mac_vendor.as_deref(), Some("Synology Incorporated"));
        assert_eq!(report.classification, ClassificationResult::unknown());
    }

    #[test]
    fn test_report_json_is_flat() {
        let classifier = test_classifier();
        let report = classify_host(
            &classifier,
            None,
            host("10.0.0.30", None, Evidence::new().with_port(9100)),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ip_addr"], "10.0.0.30");
        assert_eq!(json["role"], "printer");
        assert_eq!(json["matched_by"], "port");
        assert!(json["vendor"].is_null());
    }

    #[tokio::test]
    async fn test_classify_hosts_keeps_input_order() {
        let classifier = Arc::new(test_classifier());
        let hosts: Vec<HostEvidence> = (0..32)
            .map(|i| {
                let evidence = if i % 2 == 0 {
                    Evidence::new().with_port(9100)
                } else {
                    Evidence::new()
                };
                host(&format!("10.0.1.{}", i), None, evidence)
            })
            .collect();

        let reports = classify_hosts(classifier, None, hosts).await.unwrap();
        assert_eq!(reports.len(), 32);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.ip_addr, format!("10.0.1.{}", i));
        }

        let summary = Summary::from_reports(&reports);
        assert_eq!(summary.port, 16);
        assert_eq!(summary.none, 16);
        assert_eq!(summary.fingerprint, 0);
        assert_eq!(summary.total(), 32);
    }

    #[tokio::test]
    async fn test_join_in_order_propagates_panics() {
        let handles = vec![
            tokio::task::spawn_blocking(|| 1),
            tokio::task::spawn_blocking(|| -> i32 { panic!("boom") }),
            tokio::task::spawn_blocking(|| 3),
        ];
        let err = join_in_order(handles).await.unwrap_err();
        assert!(err.is_panic());

        let handles = vec![
            tokio::task::spawn_blocking(|| 1),
            tokio::task::spawn_blocking(|| 2),
        ];
        assert_eq!(join_in_order(handles).await.unwrap(), vec![1, 2]);
    }
}
