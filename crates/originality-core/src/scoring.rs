//! Turn fused neighbor similarities into a bounded originality score.
//!
//! # Score curve
//!
//! 1. No neighbors → `empty_score` (85).
//! 2. `s = 0.75 × top1 + 0.25 × mean(top 7)`.
//! 3. `score = 100 × (1 − s)^1.9`.
//! 4. Density penalty: `−5` for every near-duplicate (fused ≥ 0.78) in the
//!    top 7 beyond the first.
//! 5. Specificity (mean query IDF), when supplied:
//!    - generic penalty `−12 × clamp((1.7 − spec) / 0.9, 0, 1)`
//!    - detail boost `+clamp((spec − 1.3) × 9, 0, 20)`
//!    - `+8` when `spec ≥ 2.0`
//!    - ceiling of 28 when `spec < 0.5`
//! 6. Round half to even, clamp to `[2, 100]`.
//!
//! Every constant lives in [`ScoringParams`] so deployments can retune
//! them from configuration; the defaults are the values above.

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Tunable constants for the score curve, labels, and trend quadrants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Score when there is no neighbor evidence at all.
    pub empty_score: u8,
    /// Neighborhood size for the average and the density penalty.
    pub top_k: usize,
    /// Weight of the closest neighbor in the blended similarity.
    pub top1_weight: f64,
    pub curve_exponent: f64,
    /// Fused similarity at which a neighbor counts as a near-duplicate.
    pub near_duplicate_similarity: f64,
    pub density_penalty: f64,
    pub generic_penalty: f64,
    pub generic_pivot: f64,
    pub generic_span: f64,
    pub detail_pivot: f64,
    pub detail_slope: f64,
    pub detail_max_boost: f64,
    pub specific_threshold: f64,
    pub specific_bonus: f64,
    /// Queries below this specificity are under-specified, not novel.
    pub vague_threshold: f64,
    pub vague_ceiling: f64,
    pub min_score: u8,
    pub max_score: u8,
    pub unique_threshold: u8,
    pub distinct_threshold: u8,
    pub crowded_threshold: u8,
    /// Scores at or above this are "high" for trend classification.
    pub trend_high: u8,
    /// Scores at or below this are "low" for trend classification.
    pub trend_low: u8,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            empty_score: 85,
            top_k: 7,
            top1_weight: 0.75,
            curve_exponent: 1.9,
            near_duplicate_similarity: 0.78,
            density_penalty: 5.0,
            generic_penalty: 12.0,
            generic_pivot: 1.7,
            generic_span: 0.9,
            detail_pivot: 1.3,
            detail_slope: 9.0,
            detail_max_boost: 20.0,
            specific_threshold: 2.0,
            specific_bonus: 8.0,
            vague_threshold: 0.5,
            vague_ceiling: 28.0,
            min_score: 2,
            max_score: 100,
            unique_threshold: 82,
            distinct_threshold: 62,
            crowded_threshold: 38,
            trend_high: 60,
            trend_low: 40,
        }
    }
}

/// Qualitative originality band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Unique,
    Distinct,
    Crowded,
    Common,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "Unique",
            Self::Distinct => "Distinct",
            Self::Crowded => "Crowded",
            Self::Common => "Common",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All-time vs recent saturation quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    NovelThenCrowded,
    CrowdedThroughout,
    StillUnusual,
    NowDifferentiating,
    Mixed,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NovelThenCrowded => "Novel historically, crowded recently",
            Self::CrowdedThroughout => "Crowded historically and now",
            Self::StillUnusual => "Still unusual",
            Self::NowDifferentiating => "Was common, now differentiating",
            Self::Mixed => "Mixed saturation",
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            Self::NovelThenCrowded => {
                "Ideas like this used to be rare but show up often in recent submissions."
            }
            Self::CrowdedThroughout => {
                "This space has been explored heavily, both historically and recently."
            }
            Self::StillUnusual => "Even among recent submissions this looks relatively uncommon.",
            Self::NowDifferentiating => {
                "Historically common, but recent submissions show less saturation."
            }
            Self::Mixed => {
                "There is some overlap; a sharper niche or constraint would raise novelty."
            }
        }
    }
}

impl ScoringParams {
    /// Reject parameter sets that would make the curve or labels incoherent.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.top_k == 0 {
            bail!("scoring.top_k must be >= 1");
        }
        if self.min_score > self.max_score {
            bail!("scoring.min_score must be <= scoring.max_score");
        }
        if self.max_score > 100 {
            bail!("scoring.max_score must be <= 100");
        }
        if !(self.detail_max_boost >= 0.0) {
            bail!("scoring.detail_max_boost must be >= 0");
        }
        if !(self.generic_span > 0.0) {
            bail!("scoring.generic_span must be > 0");
        }
        if !(self.unique_threshold > self.distinct_threshold
            && self.distinct_threshold > self.crowded_threshold)
        {
            bail!("scoring label thresholds must be strictly decreasing: unique > distinct > crowded");
        }
        if self.trend_low >= self.trend_high {
            bail!("scoring.trend_low must be < scoring.trend_high");
        }
        Ok(())
    }

    /// Originality score in `[min_score, max_score]`.
    ///
    /// Non-finite similarities are ignored. `specificity` is the mean IDF
    /// of the query terms; `None` skips the specificity adjustments.
    pub fn score(&self, similarities: &[f64], specificity: Option<f64>) -> u8 {
        let mut sims: Vec<f64> = similarities
            .iter()
            .copied()
            .filter(|s| s.is_finite())
            .collect();
        if sims.is_empty() {
            return self.empty_score;
        }

        sims.sort_by(|a, b| b.total_cmp(a));
        let top1 = sims[0];
        let topk = &sims[..sims.len().min(self.top_k.max(1))];
        let avgk = topk.iter().sum::<f64>() / topk.len() as f64;

        let s = self.top1_weight * top1 + (1.0 - self.top1_weight) * avgk;
        let mut score = 100.0 * (1.0 - s).max(0.0).powf(self.curve_exponent);

        let close = topk
            .iter()
            .filter(|&&x| x >= self.near_duplicate_similarity)
            .count();
        score -= self.density_penalty * close.saturating_sub(1) as f64;

        if let Some(spec) = specificity {
            let generic = ((self.generic_pivot - spec) / self.generic_span).clamp(0.0, 1.0);
            score -= self.generic_penalty * generic;

            score += ((spec - self.detail_pivot) * self.detail_slope)
                .clamp(0.0, self.detail_max_boost);

            if spec >= self.specific_threshold {
                score += self.specific_bonus;
            }
            if spec < self.vague_threshold {
                score = score.min(self.vague_ceiling);
            }
        }

        score
            .round_ties_even()
            .clamp(f64::from(self.min_score), f64::from(self.max_score)) as u8
    }

    /// Qualitative band for a score.
    pub fn label(&self, score: u8) -> Label {
        if score >= self.unique_threshold {
            Label::Unique
        } else if score >= self.distinct_threshold {
            Label::Distinct
        } else if score >= self.crowded_threshold {
            Label::Crowded
        } else {
            Label::Common
        }
    }

    /// Compare all-time and recent scores. First matching quadrant wins.
    pub fn trend(&self, all_time: u8, recent: u8) -> Trend {
        let high = |s: u8| s >= self.trend_high;
        let low = |s: u8| s <= self.trend_low;

        if high(all_time) && low(recent) {
            Trend::NovelThenCrowded
        } else if low(all_time) && low(recent) {
            Trend::CrowdedThroughout
        } else if high(all_time) && high(recent) {
            Trend::StillUnusual
        } else if low(all_time) && high(recent) {
            Trend::NowDifferentiating
        } else {
            Trend::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ScoringParams {
        ScoringParams::default()
    }

    #[test]
    fn test_empty_is_presumptively_original() {
        let p = params();
        assert_eq!(p.score(&[], None), 85);
        assert_eq!(p.score(&[], Some(0.1)), 85);
        assert_eq!(p.label(85), Label::Unique);
    }

    #[test]
    fn test_nan_only_is_empty() {
        assert_eq!(params().score(&[f64::NAN, f64::INFINITY], None), 85);
    }

    #[test]
    fn test_single_neighbor_curve() {
        // s = 0.5 → 100 × 0.5^1.9 ≈ 26.79 → 27
        assert_eq!(params().score(&[0.5], None), 27);
        assert_eq!(params().score(&[0.0], None), 100);
        assert_eq!(params().score(&[1.0], None), 2);
    }

    #[test]
    fn test_density_penalty() {
        // Three identical near-duplicates: s = 0.8 → 100 × 0.2^1.9 ≈ 4.71, −10.
        assert_eq!(params().score(&[0.8, 0.8, 0.8], None), 2);
        // Two at 0.78: s = 0.78 → 100 × 0.22^1.9 ≈ 5.63, −5 → 0.63 → clamp 2.
        assert_eq!(params().score(&[0.78, 0.78], None), 2);
    }

    #[test]
    fn test_vague_query_ceiling() {
        // Raw curve near 100 but specificity 0.3 caps at 28.
        let score = params().score(&[0.0], Some(0.3));
        assert_eq!(score, 28);
        assert_eq!(params().label(score), Label::Common);
    }

    #[test]
    fn test_specific_query_bonus() {
        // s = 0.5 → 26.79; spec 2.5: generic 0, boost min(10.8, 20), bonus 8 → 45.59
        assert_eq!(params().score(&[0.5], Some(2.5)), 46);
    }

    #[test]
    fn test_generic_query_penalty() {
        // s = 0.2 → 100 × 0.8^1.9 ≈ 65.43; spec 0.8: generic 1.0 → −12, boost 0 → 53.43
        assert_eq!(params().score(&[0.2], Some(0.8)), 53);
    }

    #[test]
    fn test_score_bounds() {
        let p = params();
        let lists: [&[f64]; 5] = [&[0.0], &[1.0, 1.0, 1.0], &[0.3, 0.9], &[2.0], &[-1.0]];
        for sims in lists {
            for spec in [None, Some(0.0), Some(1.0), Some(5.0)] {
                let s = p.score(sims, spec);
                assert!((2..=100).contains(&s), "{sims:?} {spec:?} → {s}");
            }
        }
    }

    #[test]
    fn test_monotone_in_top1() {
        let p = params();
        let rest = [0.3, 0.25, 0.1];
        let mut prev = u8::MAX;
        for i in 0..=20 {
            let top1 = 0.3 + 0.035 * i as f64;
            let mut sims = vec![top1];
            sims.extend_from_slice(&rest);
            let s = p.score(&sims, Some(1.5));
            assert!(s <= prev, "top1={top1} score={s} prev={prev}");
            prev = s;
        }
    }

    #[test]
    fn test_only_top_k_counted() {
        let p = params();
        let mut sims = vec![0.4; 7];
        let base = p.score(&sims, None);
        sims.extend_from_slice(&[0.9, 0.9]);
        // The extra entries sort to the front and now dominate.
        assert!(p.score(&sims, None) < base);
        let mut tail = vec![0.4; 7];
        tail.extend_from_slice(&[0.01, 0.01]);
        assert_eq!(p.score(&tail, None), base);
    }

    #[test]
    fn test_label_thresholds() {
        let p = params();
        assert_eq!(p.label(100), Label::Unique);
        assert_eq!(p.label(82), Label::Unique);
        assert_eq!(p.label(81), Label::Distinct);
        assert_eq!(p.label(62), Label::Distinct);
        assert_eq!(p.label(61), Label::Crowded);
        assert_eq!(p.label(38), Label::Crowded);
        assert_eq!(p.label(37), Label::Common);
        assert_eq!(p.label(2), Label::Common);
    }

    #[test]
    fn test_trend_quadrants() {
        let p = params();
        assert_eq!(p.trend(85, 30), Trend::NovelThenCrowded);
        assert_eq!(p.trend(40, 40), Trend::CrowdedThroughout);
        assert_eq!(p.trend(60, 60), Trend::StillUnusual);
        assert_eq!(p.trend(20, 90), Trend::NowDifferentiating);
        assert_eq!(p.trend(50, 70), Trend::Mixed);
        assert_eq!(p.trend(70, 50), Trend::Mixed);
    }

    #[test]
    fn test_validate() {
        assert!(params().validate().is_ok());
        let bad = ScoringParams {
            distinct_threshold: 90,
            ..params()
        };
        assert!(bad.validate().is_err());
        let bad = ScoringParams {
            min_score: 50,
            max_score: 40,
            ..params()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_params_partial_override() {
        let p: ScoringParams =
            serde_json::from_str(r#"{"empty_score": 90, "vague_ceiling": 30.0}"#).unwrap();
        assert_eq!(p.empty_score, 90);
        assert_eq!(p.vague_ceiling, 30.0);
        assert_eq!(p.top_k, 7);
    }
}
