//! Late-penalty policy: the editable settings and the validated snapshot.
//!
//! Administrators write [`PolicySettings`] (a YAML file or CLI flags). The
//! settings are validated into a [`PolicyConfig`] before they are stored, so
//! everything downstream of this module can assume a well-formed policy and
//! match on closed enums instead of labels.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How late strikes are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountingMode {
    /// Every late day in the window counts
    #[default]
    Cumulative,
    /// Only the current unbroken run of late days counts
    StrictlyConsecutive,
}

/// Disciplinary consequence applied once the threshold is met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyAction {
    /// Half-day deduction
    #[default]
    HalfDay,
    /// Full-day deduction
    FullDay,
}

/// Period over which strikes accumulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrikeWindow {
    /// Strikes accumulate from the effective date onwards
    #[default]
    Unbounded,
    /// Strikes restart with the first record of every calendar month
    Monthly,
}

/// Lowercase a label and fold `-`, `_` and whitespace into single `_`.
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_ascii_lowercase()
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

impl CountingMode {
    /// Stable label used in storage and policy files
    pub fn as_label(&self) -> &'static str {
        match self {
            CountingMode::Cumulative => "cumulative",
            CountingMode::StrictlyConsecutive => "strictly_consecutive",
        }
    }
}

impl FromStr for CountingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match normalize_label(s).as_str() {
            "cumulative" => Ok(CountingMode::Cumulative),
            "strictly_consecutive" | "consecutive" => Ok(CountingMode::StrictlyConsecutive),
            _ => Err(CoreError::configuration(format!(
                "unknown counting mode '{}' (expected 'cumulative' or 'strictly consecutive')",
                s
            ))),
        }
    }
}

impl fmt::Display for CountingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountingMode::Cumulative => write!(f, "Cumulative"),
            CountingMode::StrictlyConsecutive => write!(f, "Strictly Consecutive"),
        }
    }
}

impl PenaltyAction {
    /// Stable label used in storage and policy files
    pub fn as_label(&self) -> &'static str {
        match self {
            PenaltyAction::HalfDay => "half_day",
            PenaltyAction::FullDay => "full_day",
        }
    }
}

impl FromStr for PenaltyAction {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match normalize_label(s).as_str() {
            "half_day" | "halfday" => Ok(PenaltyAction::HalfDay),
            "full_day" | "fullday" => Ok(PenaltyAction::FullDay),
            _ => Err(CoreError::configuration(format!(
                "unknown penalty action '{}' (expected 'half-day' or 'full-day')",
                s
            ))),
        }
    }
}

impl fmt::Display for PenaltyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyAction::HalfDay => write!(f, "Half-day"),
            PenaltyAction::FullDay => write!(f, "Full-day"),
        }
    }
}

impl StrikeWindow {
    /// Stable label used in storage and policy files
    pub fn as_label(&self) -> &'static str {
        match self {
            StrikeWindow::Unbounded => "unbounded",
            StrikeWindow::Monthly => "monthly",
        }
    }
}

impl FromStr for StrikeWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match normalize_label(s).as_str() {
            "unbounded" | "none" => Ok(StrikeWindow::Unbounded),
            "monthly" | "month" => Ok(StrikeWindow::Monthly),
            _ => Err(CoreError::configuration(format!(
                "unknown strike window '{}' (expected 'unbounded' or 'monthly')",
                s
            ))),
        }
    }
}

impl fmt::Display for StrikeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Validated, immutable snapshot of the active late-penalty policy.
///
/// Construct through [`PolicyConfig::new`], [`PolicyConfig::disabled`] or
/// [`PolicySettings::validate`]. The threshold is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyConfig {
    enabled: bool,
    threshold: u32,
    counting_mode: CountingMode,
    penalty_action: PenaltyAction,
    effective_from: Option<NaiveDate>,
    window: StrikeWindow,
}

impl PolicyConfig {
    /// Create an enabled policy
    pub fn new(
        threshold: u32,
        counting_mode: CountingMode,
        penalty_action: PenaltyAction,
    ) -> CoreResult<Self> {
        if threshold < 1 {
            return Err(CoreError::configuration(
                "strike threshold must be at least 1",
            ));
        }
        Ok(Self {
            enabled: true,
            threshold,
            counting_mode,
            penalty_action,
            effective_from: None,
            window: StrikeWindow::Unbounded,
        })
    }

    /// A disabled policy: no penalty logic runs and derived fields reset.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            threshold: 1,
            counting_mode: CountingMode::default(),
            penalty_action: PenaltyAction::default(),
            effective_from: None,
            window: StrikeWindow::default(),
        }
    }

    /// Records dated before `date` are not subject to the policy
    pub fn with_effective_from(mut self, date: Option<NaiveDate>) -> Self {
        self.effective_from = date;
        self
    }

    pub fn with_window(mut self, window: StrikeWindow) -> Self {
        self.window = window;
        self
    }

    /// Same policy with the enabled flag switched off
    pub fn into_disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn counting_mode(&self) -> CountingMode {
        self.counting_mode
    }

    pub fn penalty_action(&self) -> PenaltyAction {
        self.penalty_action
    }

    pub fn effective_from(&self) -> Option<NaiveDate> {
        self.effective_from
    }

    pub fn window(&self) -> StrikeWindow {
        self.window
    }

    /// Whether a record dated `date` falls under this policy
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.effective_from.map_or(true, |from| date >= from)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Late-penalty settings as an administrator writes them.
///
/// ```yaml
/// enabled: true
/// strike_threshold: 3
/// counting_mode: strictly consecutive
/// penalty_action: half-day
/// apply_from_date: 2025-01-01
/// window: monthly
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySettings {
    /// Master switch for late penalties
    #[serde(default, alias = "enable_late_penalty")]
    pub enabled: bool,

    /// Strikes needed to trigger a penalty (signed so that 0 and negatives
    /// reach validation instead of failing to parse)
    #[serde(default)]
    pub strike_threshold: Option<i64>,

    #[serde(default)]
    pub counting_mode: Option<String>,

    #[serde(default)]
    pub penalty_action: Option<String>,

    /// First date the policy applies to
    #[serde(default)]
    pub apply_from_date: Option<NaiveDate>,

    /// `unbounded` (default) or `monthly`
    #[serde(default)]
    pub window: Option<String>,
}

impl PolicySettings {
    /// Parse settings from YAML text
    pub fn from_yaml_str(content: &str) -> CoreResult<Self> {
        serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
            message: e.to_string(),
        })
    }

    /// Load settings from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Validate into an activatable [`PolicyConfig`].
    ///
    /// Threshold, counting mode and penalty action are mandatory only when
    /// the policy is enabled, but any value that is present must be valid.
    pub fn validate(&self) -> CoreResult<PolicyConfig> {
        if self.enabled {
            let missing: Vec<&str> = [
                ("strike_threshold", self.strike_threshold.is_none()),
                ("counting_mode", self.counting_mode.is_none()),
                ("penalty_action", self.penalty_action.is_none()),
            ]
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect();
            if !missing.is_empty() {
                return Err(CoreError::configuration(format!(
                    "{} required when late penalty is enabled",
                    missing.join(", ")
                )));
            }
        }

        let threshold = match self.strike_threshold {
            Some(t) if t < 1 => {
                return Err(CoreError::configuration(format!(
                    "strike threshold must be at least 1, got {}",
                    t
                )))
            }
            Some(t) => u32::try_from(t).map_err(|_| {
                CoreError::configuration(format!("strike threshold {} is too large", t))
            })?,
            None => 1,
        };
        let counting_mode = self
            .counting_mode
            .as_deref()
            .map(CountingMode::from_str)
            .transpose()?
            .unwrap_or_default();
        let penalty_action = self
            .penalty_action
            .as_deref()
            .map(PenaltyAction::from_str)
            .transpose()?
            .unwrap_or_default();
        let window = self
            .window
            .as_deref()
            .map(StrikeWindow::from_str)
            .transpose()?
            .unwrap_or_default();

        let policy = PolicyConfig::new(threshold, counting_mode, penalty_action)?
            .with_effective_from(self.apply_from_date)
            .with_window(window);
        Ok(if self.enabled {
            policy
        } else {
            policy.into_disabled()
        })
    }
}

impl From<&PolicyConfig> for PolicySettings {
    fn from(policy: &PolicyConfig) -> Self {
        Self {
            enabled: policy.enabled,
            strike_threshold: Some(i64::from(policy.threshold)),
            counting_mode: Some(policy.counting_mode.as_label().to_string()),
            penalty_action: Some(policy.penalty_action.as_label().to_string()),
            apply_from_date: policy.effective_from,
            window: Some(policy.window.as_label().to_string()),
        }
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
