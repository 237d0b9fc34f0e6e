use std::collections::BTreeSet;
use std::str::FromStr;

use logdeck_core::AppError;

const WILDCARD: &str = "*";

/// Parsed wildcard permission such as `streams:read,edit:*`.
///
/// Parts are separated by `:`, a part may list alternatives separated by `,`,
/// and `*` matches anything. A pattern with fewer parts implies every more
/// specific permission below it. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPattern {
    parts: Vec<BTreeSet<String>>,
}

impl PermissionPattern {
    /// Returns whether this granted pattern covers `required`.
    #[must_use]
    pub fn implies(&self, required: &Self) -> bool {
        for (index, required_part) in required.parts.iter().enumerate() {
            let Some(granted_part) = self.parts.get(index) else {
                return true;
            };
            if !granted_part.contains(WILDCARD) && !required_part.is_subset(granted_part) {
                return false;
            }
        }

        self.parts
            .iter()
            .skip(required.parts.len())
            .all(|part| part.contains(WILDCARD))
    }
}

impl FromStr for PermissionPattern {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "permission must not be empty".to_owned(),
            ));
        }

        let mut parts = Vec::new();
        for raw_part in trimmed.split(':') {
            let part: BTreeSet<String> = raw_part
                .split(',')
                .map(|token| token.trim().to_lowercase())
                .filter(|token| !token.is_empty())
                .collect();
            if part.is_empty() {
                return Err(AppError::Validation(format!(
                    "permission '{value}' contains an empty part"
                )));
            }
            parts.push(part);
        }

        Ok(Self { parts })
    }
}

/// Returns whether `granted` covers every permission in `required`.
///
/// Unparseable granted entries are ignored; an unparseable required entry is
/// never satisfied.
#[must_use]
pub fn is_permitted<G, R>(granted: &[G], required: &[R]) -> bool
where
    G: AsRef<str>,
    R: AsRef<str>,
{
    let granted: Vec<PermissionPattern> = granted
        .iter()
        .filter_map(|permission| permission.as_ref().parse().ok())
        .collect();

    required.iter().all(|permission| {
        permission
            .as_ref()
            .parse::<PermissionPattern>()
            .map(|required| granted.iter().any(|pattern| pattern.implies(&required)))
            .unwrap_or(false)
    })
}

/// Permission to edit one view.
#[must_use]
pub fn view_edit_permission(view_id: &str) -> String {
    format!("view:edit:{view_id}")
}

/// Permission to read one view.
#[must_use]
pub fn view_read_permission(view_id: &str) -> String {
    format!("view:read:{view_id}")
}

/// Dashboard edit permission from before views and dashboards shared one scheme.
#[must_use]
pub fn legacy_dashboard_edit_permission(view_id: &str) -> String {
    format!("dashboards:edit:{view_id}")
}
