//! Simulated health metrics and the weekly bounded random walk.
//!
//! A [`MetricSnapshot`] is created at baseline for every journey, drifted
//! once per simulated week by [`MetricSnapshot::advance_week`], and
//! occasionally overwritten by scripted milestones via [`MetricPatch`].
//! Every mutation ends with [`MetricSnapshot::clamp`], so numeric fields
//! never leave their plausible ranges.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const HRV_RANGE: RangeInclusive<i32> = 30..=90;
pub const RESTING_HR_RANGE: RangeInclusive<i32> = 48..=80;
pub const GLUCOSE_RANGE: RangeInclusive<i32> = 80..=130;
pub const APOB_RANGE: RangeInclusive<i32> = 60..=130;
pub const RECOVERY_RANGE: RangeInclusive<i32> = 0..=100;
pub const DEEP_SLEEP_RANGE: RangeInclusive<i32> = 20..=120;

/// Probability that a categorical symptom moves one level in a given week.
const SEVERITY_STEP_CHANCE: f64 = 0.2;

/// Ordered symptom scale shared by POTS symptoms and back pain.
///
/// Deserialization is lenient: unknown labels read as `Mild`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    const SCALE: [Severity; 4] = [
        Severity::None,
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }

    /// Move `delta` levels along the scale, never below `floor`.
    pub fn step(self, delta: i8, floor: Severity) -> Severity {
        let idx = (self as i8 + delta).clamp(floor as i8, Severity::Severe as i8);
        Self::SCALE[idx as usize]
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "none" => Severity::None,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::Mild,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The simulated health indicators carried on every event.
///
/// Missing fields in caller-supplied JSON fall back to the baseline values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricSnapshot {
    /// Heart-rate variability, ms.
    #[serde(rename = "HRV")]
    pub hrv: i32,
    /// Resting heart rate, bpm.
    #[serde(rename = "RestingHR")]
    pub resting_hr: i32,
    /// Average glucose, mg/dL.
    #[serde(rename = "GlucoseAvg")]
    pub glucose_avg: i32,
    /// Apolipoprotein B, mg/dL.
    #[serde(rename = "ApoB")]
    pub apob: i32,
    /// Recovery score, percent.
    #[serde(rename = "RecoveryScore")]
    pub recovery_score: i32,
    /// Deep sleep, minutes per night.
    #[serde(rename = "DeepSleep")]
    pub deep_sleep: i32,
    #[serde(rename = "POTS_symptoms")]
    pub pots_symptoms: Severity,
    #[serde(rename = "BackPain")]
    pub back_pain: Severity,
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Scripted values that overwrite part of a snapshot wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricPatch {
    pub hrv: Option<i32>,
    pub resting_hr: Option<i32>,
    pub glucose_avg: Option<i32>,
    pub apob: Option<i32>,
    pub recovery_score: Option<i32>,
    pub deep_sleep: Option<i32>,
    pub pots_symptoms: Option<Severity>,
    pub back_pain: Option<Severity>,
}

/// Direction of a small narrative nudge (exercise adherence or deviation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Positive,
    Negative,
}

impl MetricSnapshot {
    /// Values every journey starts from.
    pub fn baseline() -> Self {
        MetricSnapshot {
            hrv: 45,
            resting_hr: 65,
            glucose_avg: 105,
            apob: 105,
            recovery_score: 70,
            deep_sleep: 60,
            pots_symptoms: Severity::Moderate,
            back_pain: Severity::Mild,
        }
    }

    /// Apply one week of drift.
    ///
    /// Every numeric field takes a signed random step plus a slow trend;
    /// weeks divisible by `travel_interval` carry fixed extra penalties.
    /// Symptom severities may move one level either way.
    pub fn advance_week<R: Rng + ?Sized>(&mut self, week: u32, travel_interval: u32, rng: &mut R) {
        let travel_week = travel_interval > 0 && week % travel_interval == 0;
        let trend = |every: u32, by: i32| if week % every == 0 { by } else { 0 };
        let penalty = |by: i32| if travel_week { by } else { 0 };

        self.hrv += rng.gen_range(-4..=4) + trend(3, 1) + penalty(-3);
        self.resting_hr += rng.gen_range(-3..=3) + trend(4, -1) + penalty(2);
        self.glucose_avg += rng.gen_range(-5..=5) + trend(6, -1) + penalty(3);
        self.apob += rng.gen_range(-2..=2) + trend(4, -1) + penalty(1);
        self.recovery_score += rng.gen_range(-6..=6) + trend(2, 1) + penalty(-5);
        self.deep_sleep += rng.gen_range(-10..=10) + trend(3, 1) + penalty(-8);

        self.pots_symptoms = drift_severity(self.pots_symptoms, Severity::Mild, travel_week, rng);
        self.back_pain = drift_severity(self.back_pain, Severity::None, travel_week, rng);

        self.clamp();
    }

    /// Negative shock applied around a travel week, larger than weekly drift.
    pub fn apply_travel_shock<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.hrv -= rng.gen_range(6..=10);
        self.resting_hr += rng.gen_range(3..=6);
        self.glucose_avg += rng.gen_range(4..=9);
        self.recovery_score -= rng.gen_range(10..=18);
        self.deep_sleep -= rng.gen_range(12..=20);
        if rng.gen_bool(0.4) {
            self.back_pain = self.back_pain.step(1, Severity::None);
        }
        self.clamp();
    }

    pub fn apply_nudge(&mut self, nudge: Nudge) {
        match nudge {
            Nudge::Positive => {
                self.hrv += 2;
                self.resting_hr -= 1;
                self.recovery_score += 3;
                self.deep_sleep += 4;
            }
            Nudge::Negative => {
                self.hrv -= 2;
                self.resting_hr += 1;
                self.recovery_score -= 4;
                self.glucose_avg += 2;
            }
        }
        self.clamp();
    }

    pub fn apply_patch(&mut self, patch: &MetricPatch) {
        if let Some(v) = patch.hrv {
            self.hrv = v;
        }
        if let Some(v) = patch.resting_hr {
            self.resting_hr = v;
        }
        if let Some(v) = patch.glucose_avg {
            self.glucose_avg = v;
        }
        if let Some(v) = patch.apob {
            self.apob = v;
        }
        if let Some(v) = patch.recovery_score {
            self.recovery_score = v;
        }
        if let Some(v) = patch.deep_sleep {
            self.deep_sleep = v;
        }
        if let Some(v) = patch.pots_symptoms {
            self.pots_symptoms = v;
        }
        if let Some(v) = patch.back_pain {
            self.back_pain = v;
        }
        self.clamp();
    }

    /// Force every numeric field back into its declared range.
    pub fn clamp(&mut self) {
        self.hrv = clamp_to(self.hrv, &HRV_RANGE);
        self.resting_hr = clamp_to(self.resting_hr, &RESTING_HR_RANGE);
        self.glucose_avg = clamp_to(self.glucose_avg, &GLUCOSE_RANGE);
        self.apob = clamp_to(self.apob, &APOB_RANGE);
        self.recovery_score = clamp_to(self.recovery_score, &RECOVERY_RANGE);
        self.deep_sleep = clamp_to(self.deep_sleep, &DEEP_SLEEP_RANGE);
        if self.pots_symptoms < Severity::Mild {
            self.pots_symptoms = Severity::Mild;
        }
    }

    /// True when every numeric field sits inside its range.
    pub fn in_range(&self) -> bool {
        HRV_RANGE.contains(&self.hrv)
            && RESTING_HR_RANGE.contains(&self.resting_hr)
            && GLUCOSE_RANGE.contains(&self.glucose_avg)
            && APOB_RANGE.contains(&self.apob)
            && RECOVERY_RANGE.contains(&self.recovery_score)
            && DEEP_SLEEP_RANGE.contains(&self.deep_sleep)
            && self.pots_symptoms >= Severity::Mild
    }
}

fn clamp_to(value: i32, range: &RangeInclusive<i32>) -> i32 {
    value.clamp(*range.start(), *range.end())
}

fn drift_severity<R: Rng + ?Sized>(
    current: Severity,
    floor: Severity,
    travel_week: bool,
    rng: &mut R,
) -> Severity {
    if !rng.gen_bool(SEVERITY_STEP_CHANCE) {
        return current;
    }
    // Travel weeks lean toward worsening.
    let worsen = if travel_week { 0.65 } else { 0.4 };
    let delta = if rng.gen_bool(worsen) { 1 } else { -1 };
    current.step(delta, floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn drift_stays_in_range_for_many_weeks() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut m = MetricSnapshot::baseline();
            for week in 1..=200 {
                m.advance_week(week, 4, &mut rng);
                if week % 4 == 0 {
                    m.apply_travel_shock(&mut rng);
                }
                assert!(m.in_range(), "seed {} week {}: {:?}", seed, week, m);
            }
        }
    }

    #[test]
    fn patch_is_clamped() {
        let mut m = MetricSnapshot::baseline();
        m.apply_patch(&MetricPatch {
            hrv: Some(500),
            recovery_score: Some(-20),
            pots_symptoms: Some(Severity::None),
            ..MetricPatch::default()
        });
        assert_eq!(m.hrv, 90);
        assert_eq!(m.recovery_score, 0);
        assert_eq!(m.pots_symptoms, Severity::Mild);
        assert_eq!(m.apob, 105);
    }

    #[test]
    fn severity_steps_respect_floor_and_ceiling() {
        assert_eq!(Severity::Severe.step(1, Severity::None), Severity::Severe);
        assert_eq!(Severity::Mild.step(-1, Severity::Mild), Severity::Mild);
        assert_eq!(Severity::Mild.step(-1, Severity::None), Severity::None);
        assert_eq!(Severity::Moderate.step(1, Severity::None), Severity::Severe);
    }

    #[test]
    fn snapshot_uses_wire_names() {
        let json = serde_json::to_value(MetricSnapshot::baseline()).unwrap();
        assert_eq!(json["HRV"], 45);
        assert_eq!(json["POTS_symptoms"], "moderate");
        assert_eq!(json["BackPain"], "mild");
    }

    #[test]
    fn partial_snapshot_fills_from_baseline() {
        let m: MetricSnapshot =
            serde_json::from_str(r#"{"ApoB": 92, "BackPain": "whatever"}"#).unwrap();
        assert_eq!(m.apob, 92);
        assert_eq!(m.hrv, 45);
        assert_eq!(m.back_pain, Severity::Mild);
    }
}
