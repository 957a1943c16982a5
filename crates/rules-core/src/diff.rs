//! Rule set comparison
//!
//! Records are matched by name within the group of the same name. A record
//! that changed interval therefore lands in a different group and shows up
//! as deleted from the old group and added to the new one.

use std::collections::{HashMap, HashSet};

use rules_meta::RuleSet;
use tracing::{debug, info};

/// Names of the records that differ between current and desired state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// In the desired state only
    pub added: Vec<String>,
    /// In both, with a different expression or labels
    pub updated: Vec<String>,
    /// In the current state only
    pub deleted: Vec<String>,
}

impl DiffReport {
    /// Number of changes; convergence happens only when this is nonzero.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    pub fn log(&self) {
        if self.is_empty() {
            debug!("rules already converged");
            return;
        }
        info!(
            added = ?self.added,
            updated = ?self.updated,
            deleted = ?self.deleted,
            changes = self.change_count(),
            "rule changes detected"
        );
    }
}

/// Classify every record of `local` and `remote`.
pub fn diff(local: &RuleSet, remote: &RuleSet) -> DiffReport {
    // name -> not yet matched by any remote record
    let mut unmatched: HashMap<&str, bool> = local
        .records()
        .map(|record| (record.name.as_str(), true))
        .collect();

    let mut report = DiffReport::default();

    for group in remote.groups() {
        let local_group = local.group(&group.name);
        for remote_record in &group.records {
            match local_group.and_then(|g| g.find(&remote_record.name)) {
                None => report.added.push(remote_record.name.clone()),
                Some(local_record) => {
                    unmatched.insert(local_record.name.as_str(), false);
                    if local_record != remote_record {
                        report.updated.push(remote_record.name.clone());
                    }
                }
            }
        }
    }

    let mut reported = HashSet::new();
    report.deleted = local
        .records()
        .map(|record| record.name.as_str())
        .filter(|name| unmatched.get(name) == Some(&true) && reported.insert(*name))
        .map(str::to_string)
        .collect();

    report
}
