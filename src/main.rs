use std::fs;
use std::io::{self, Read, Write};
use std::sync::Arc;

use clap::Parser;

use device_classifier::config::{Config, OutputFormat, init_tracing};
use device_classifier::report::{Summary, classify_hosts};
use device_classifier::{Classifier, HostEvidence, OuiTable, RulesFile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(&config);

    // Rule errors are startup-fatal
    let rules = RulesFile::load(&config.rules)?;
    let ports = rules.port_role_table()?;
    let mut fingerprints = rules.fingerprint_rule_set()?;
    if let Some(limit) = config.max_text_len {
        fingerprints = fingerprints.with_max_text_len(limit);
    }

    if config.verify {
        tracing::info!(
            port_roles = ports.len(),
            fingerprint_rules = fingerprints.len(),
            "rules file is valid"
        );
        return Ok(());
    }

    let classifier = Arc::new(Classifier::new(ports, fingerprints));

    let oui = match &config.oui {
        Some(path) => Some(Arc::new(OuiTable::load(path)?)),
        None => {
            tracing::warn!("no OUI file given; reports will not include MAC vendors");
            None
        }
    };

    let input = match &config.evidence {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let hosts: Vec<HostEvidence> = serde_json::from_str(&input)?;
    tracing::info!(hosts = hosts.len(), "classifying hosts");

    let reports = classify_hosts(classifier, oui, hosts).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &reports)?;
            writeln!(out)?;
        }
        OutputFormat::Lines => {
            for report in &reports {
                serde_json::to_writer(&mut out, report)?;
                writeln!(out)?;
            }
        }
    }

    let summary = Summary::from_reports(&reports);
    tracing::info!(
        total = summary.total(),
        fingerprint = summary.fingerprint,
        port = summary.port,
        unknown = summary.none,
        "classification finished"
    );

    Ok(())
}
