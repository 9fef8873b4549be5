//! Rule matching between overlay keys and incoming queries
//!
//! Wildcards are not commutative: a wildcard on the rule side accepts any
//! candidate value, while a wildcard on the candidate side only satisfies a
//! rule that is itself unconstrained for that field. Overlay keys are always
//! passed as `rule`, requests always as `candidate`.

use super::query::{Query, is_unset};

/// Does `rule` apply to `candidate`?
///
/// A missing candidate only matches a rule with no constraints at all.
pub fn matches(rule: &Query, candidate: Option<&Query>) -> bool {
    let Some(candidate) = candidate else {
        return rule.is_unconstrained();
    };

    field_matches(&rule.os, &candidate.os)
        && rule.os_version.matches(&candidate.os_version)
        && rule.kernel.matches(&candidate.kernel)
        && field_matches(&rule.service, &candidate.service)
        && rule.k8s_version.matches(&candidate.k8s_version)
        && field_matches(&rule.gpu, &candidate.gpu)
        && field_matches(&rule.intent, &candidate.intent)
}

fn field_matches(rule: &str, candidate: &str) -> bool {
    if is_unset(rule) {
        return true;
    }
    if is_unset(candidate) {
        return false;
    }
    rule.trim().eq_ignore_ascii_case(candidate.trim())
}
