use crate::models::{CompatibilityBreakdown, IdealType, Profile, ScoringWeights};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// MBTI compatibility table: each of the 16 types maps to its 4 most
/// compatible types. Entries are not necessarily symmetric.
fn mbti_table() -> &'static HashMap<&'static str, [&'static str; 4]> {
    static TABLE: OnceLock<HashMap<&'static str, [&'static str; 4]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("INTJ", ["ENFP", "ENTP", "INFJ", "INFP"]),
            ("INTP", ["ENFJ", "ENTJ", "INFJ", "INFP"]),
            ("ENTJ", ["INFP", "INTP", "ENFP", "ENTP"]),
            ("ENTP", ["INFJ", "INTJ", "ENFJ", "ENTJ"]),
            ("INFJ", ["ENFP", "ENTP", "INFP", "ENFJ"]),
            ("INFP", ["ENFJ", "ENTJ", "INFJ", "ENFP"]),
            ("ENFJ", ["INFP", "INTP", "INFJ", "ENFP"]),
            ("ENFP", ["INTJ", "INFJ", "ENFJ", "ENTP"]),
            ("ISTJ", ["ESFP", "ESTP", "ISFJ", "ISFP"]),
            ("ISFJ", ["ESFP", "ESTP", "ISTJ", "ISFP"]),
            ("ESTJ", ["ISFP", "ISTP", "ESFP", "ESTP"]),
            ("ESFJ", ["ISFP", "ISTP", "ISFJ", "ESFP"]),
            ("ISTP", ["ESFJ", "ESTJ", "ISFJ", "ESFP"]),
            ("ISFP", ["ESFJ", "ESTJ", "ISFJ", "ESFP"]),
            ("ESTP", ["ISFJ", "ISTJ", "ESFJ", "ESFP"]),
            ("ESFP", ["ISFJ", "ISTJ", "ESFJ", "ESTP"]),
        ])
    })
}

/// Department groups: departments in the same group score 0.8.
fn department_groups() -> &'static [&'static [&'static str]] {
    &[
        // engineering
        &["컴퓨터공학과", "전자공학과", "기계공학과", "화학공학과", "건축공학과", "산업공학과"],
        // humanities
        &["국어국문학과", "영어영문학과", "사학과", "철학과", "문예창작학과"],
        // social sciences
        &["경영학과", "경제학과", "정치외교학과", "사회학과", "심리학과", "행정학과"],
        // natural sciences
        &["수학과", "물리학과", "화학과", "생물학과", "지구환경과학과"],
        // arts and sports
        &["미술학과", "음악학과", "체육학과", "디자인학과", "무용학과"],
        // medical
        &["의학과", "간호학과", "약학과", "치의학과", "한의학과"],
    ]
}

fn is_table_compatible(a: &str, b: &str) -> bool {
    mbti_table()
        .get(a)
        .map(|types| types.contains(&b))
        .unwrap_or(false)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rule-based pairwise compatibility scorer.
///
/// Scoring formula (weights sum to 1.0):
/// ```text
/// score = mbti        * 0.25
///       + interests   * 0.20
///       + personality * 0.20
///       + ideal_type  * 0.15
///       + department  * 0.10
///       + age         * 0.05
///       + height      * 0.05
/// ```
/// Pure and deterministic; symmetric because every sub-score is either
/// order-independent or averaged over both directions.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityScorer {
    weights: ScoringWeights,
}

impl CompatibilityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Total compatibility score in [0, 1], rounded to 2 decimals.
    pub fn score(&self, a: &Profile, b: &Profile) -> f64 {
        let w = &self.weights;
        let total = mbti_score(a.mbti.as_deref(), b.mbti.as_deref()) * w.mbti
            + interest_score(&a.interests, &b.interests) * w.interests
            + personality_score(&a.personality_keywords, &b.personality_keywords) * w.personality
            + ideal_type_score(a, b) * w.ideal_type
            + department_score(a.department.as_deref(), b.department.as_deref()) * w.department
            + age_score(a.birth.as_deref(), b.birth.as_deref()) * w.age
            + height_score(a.height.as_deref(), b.height.as_deref()) * w.height;

        round2(total)
    }

    /// All seven sub-scores plus the total, for diagnostics.
    pub fn detailed_score(&self, a: &Profile, b: &Profile) -> CompatibilityBreakdown {
        CompatibilityBreakdown {
            mbti: mbti_score(a.mbti.as_deref(), b.mbti.as_deref()),
            interests: interest_score(&a.interests, &b.interests),
            personality: personality_score(&a.personality_keywords, &b.personality_keywords),
            ideal_type: ideal_type_score(a, b),
            department: department_score(a.department.as_deref(), b.department.as_deref()),
            age: age_score(a.birth.as_deref(), b.birth.as_deref()),
            height: height_score(a.height.as_deref(), b.height.as_deref()),
            total: self.score(a, b),
        }
    }
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// MBTI sub-score: identical 0.8, table-compatible 0.9, otherwise
/// 0.3 + 0.1 per matching letter at the same position.
#[inline]
pub fn mbti_score(a: Option<&str>, b: Option<&str>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.5,
    };

    if a == b {
        return 0.8;
    }

    if is_table_compatible(a, b) {
        return 0.9;
    }

    let common = a
        .chars()
        .zip(b.chars())
        .filter(|(ca, cb)| ca == cb)
        .count();

    0.3 + common as f64 * 0.1
}

#[inline]
fn jaccard(a: &[String], b: &[String]) -> Option<f64> {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    if union == 0 {
        return None;
    }

    Some(intersection as f64 / union as f64)
}

/// Interest overlap mapped into [0.3, 1.0]; missing lists are neutral.
#[inline]
pub fn interest_score(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.5;
    }

    match jaccard(a, b) {
        Some(j) => 0.3 + j * 0.7,
        None => 0.5,
    }
}

/// Personality-keyword overlap mapped into [0.4, 1.0]; missing lists are neutral.
#[inline]
pub fn personality_score(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.5;
    }

    match jaccard(a, b) {
        Some(j) => 0.4 + j * 0.6,
        None => 0.5,
    }
}

/// Mutual ideal-type score: each direction evaluated independently, then
/// averaged. A side without an ideal type contributes the neutral 0.7.
#[inline]
pub fn ideal_type_score(a: &Profile, b: &Profile) -> f64 {
    let a_to_b = ideal_type_match(a.ideal_type.as_ref(), b);
    let b_to_a = ideal_type_match(b.ideal_type.as_ref(), a);

    (a_to_b + b_to_a) / 2.0
}

/// One direction: how well `target` fits `ideal`. Averages the criteria that
/// could actually be evaluated (MBTI, personality keywords).
fn ideal_type_match(ideal: Option<&IdealType>, target: &Profile) -> f64 {
    let ideal = match ideal {
        Some(ideal) => ideal,
        None => return 0.7,
    };

    let mut score = 0.0;
    let mut criteria = 0;

    if let (Some(wanted), Some(actual)) = (ideal.mbti.as_deref(), target.mbti.as_deref()) {
        criteria += 1;
        score += if wanted == actual {
            1.0
        } else if is_table_compatible(wanted, actual) {
            0.8
        } else {
            0.3
        };
    }

    if !ideal.personality_keywords.is_empty() && !target.personality_keywords.is_empty() {
        criteria += 1;

        let wanted: HashSet<&str> = ideal
            .personality_keywords
            .iter()
            .map(String::as_str)
            .collect();
        let actual: HashSet<&str> = target
            .personality_keywords
            .iter()
            .map(String::as_str)
            .collect();

        score += wanted.intersection(&actual).count() as f64 / wanted.len() as f64;
    }

    if criteria > 0 {
        score / criteria as f64
    } else {
        0.7
    }
}

/// Department sub-score: identical 1.0, same group 0.8, otherwise 0.4.
#[inline]
pub fn department_score(a: Option<&str>, b: Option<&str>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.5,
    };

    if a == b {
        return 1.0;
    }

    let same_group = department_groups()
        .iter()
        .any(|group| group.contains(&a) && group.contains(&b));

    if same_group {
        0.8
    } else {
        0.4
    }
}

fn birth_year(birth: &str) -> Option<i32> {
    birth.get(0..4)?.parse().ok()
}

/// Age sub-score from birth-year difference; unparseable dates are neutral.
#[inline]
pub fn age_score(birth_a: Option<&str>, birth_b: Option<&str>) -> f64 {
    let years = match (birth_a.and_then(birth_year), birth_b.and_then(birth_year)) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => return 0.5,
    };

    match years {
        0 => 1.0,
        1 => 0.9,
        2 => 0.8,
        3 => 0.7,
        4 | 5 => 0.6,
        6 | 7 => 0.4,
        _ => 0.2,
    }
}

fn parse_height_cm(height: &str) -> Option<i32> {
    let digits: String = height.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Height sub-score from centimeter difference; unparseable values are neutral.
#[inline]
pub fn height_score(height_a: Option<&str>, height_b: Option<&str>) -> f64 {
    let diff = match (
        height_a.and_then(parse_height_cm),
        height_b.and_then(parse_height_cm),
    ) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => return 0.5,
    };

    match diff {
        0..=3 => 1.0,
        4..=5 => 0.9,
        6..=10 => 0.8,
        11..=15 => 0.6,
        16..=20 => 0.4,
        _ => 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        id: &str,
        mbti: &str,
        interests: &[&str],
        keywords: &[&str],
        department: &str,
        birth: &str,
        height: &str,
    ) -> Profile {
        Profile {
            user_id: id.to_string(),
            name: None,
            mbti: Some(mbti.to_string()),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            personality_keywords: keywords.iter().map(|s| s.to_string()).collect(),
            department: Some(department.to_string()),
            birth: Some(birth.to_string()),
            height: Some(height.to_string()),
            ideal_type: None,
        }
    }

    #[test]
    fn test_mbti_identical() {
        assert_eq!(mbti_score(Some("INTJ"), Some("INTJ")), 0.8);
    }

    #[test]
    fn test_mbti_table_pair() {
        assert_eq!(mbti_score(Some("INTJ"), Some("ENFP")), 0.9);
    }

    #[test]
    fn test_mbti_missing() {
        assert_eq!(mbti_score(None, Some("INTJ")), 0.5);
        assert_eq!(mbti_score(Some("INTJ"), None), 0.5);
        assert_eq!(mbti_score(None, None), 0.5);
    }

    #[test]
    fn test_mbti_positional_letters() {
        // INTJ vs ISTJ share I, T, J -> 0.3 + 3 * 0.1
        let score = mbti_score(Some("INTJ"), Some("ISTJ"));
        assert!((score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_mbti_table_has_sixteen_entries_of_four() {
        let table = mbti_table();
        assert_eq!(table.len(), 16);
        for types in table.values() {
            assert_eq!(types.len(), 4);
        }
    }

    #[test]
    fn test_interest_jaccard() {
        let a = vec!["독서".to_string(), "영화".to_string()];
        let b = vec!["독서".to_string(), "여행".to_string()];

        // J = 1/3
        let score = interest_score(&a, &b);
        assert!((score - (0.3 + 0.7 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_interest_empty_is_neutral() {
        assert_eq!(interest_score(&[], &["독서".to_string()]), 0.5);
    }

    #[test]
    fn test_personality_jaccard() {
        let a = vec!["차분한".to_string(), "다정한".to_string()];
        let b = vec!["차분한".to_string(), "다정한".to_string()];

        assert_eq!(personality_score(&a, &b), 1.0);
    }

    #[test]
    fn test_ideal_type_no_preference_is_neutral() {
        let a = Profile::bare("a");
        let b = Profile::bare("b");
        assert_eq!(ideal_type_score(&a, &b), 0.7);
    }

    #[test]
    fn test_ideal_type_exact_mbti_one_direction() {
        let mut a = Profile::bare("a");
        a.ideal_type = Some(IdealType {
            mbti: Some("ENFP".to_string()),
            age_range: None,
            personality_keywords: vec![],
        });
        let mut b = Profile::bare("b");
        b.mbti = Some("ENFP".to_string());

        // a's direction scores 1.0, b has no ideal type -> 0.7; averaged
        assert!((ideal_type_score(&a, &b) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_ideal_type_keyword_fraction() {
        let mut a = Profile::bare("a");
        a.ideal_type = Some(IdealType {
            mbti: None,
            age_range: None,
            personality_keywords: vec!["차분한".to_string(), "유머러스".to_string()],
        });
        let mut b = Profile::bare("b");
        b.personality_keywords = vec!["차분한".to_string()];

        // half of the ideal keywords present -> 0.5; other side neutral 0.7
        assert!((ideal_type_score(&a, &b) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_department_identical() {
        assert_eq!(department_score(Some("컴퓨터공학과"), Some("컴퓨터공학과")), 1.0);
    }

    #[test]
    fn test_department_same_group() {
        assert_eq!(department_score(Some("컴퓨터공학과"), Some("전자공학과")), 0.8);
    }

    #[test]
    fn test_department_unrelated() {
        assert_eq!(department_score(Some("컴퓨터공학과"), Some("철학과")), 0.4);
    }

    #[test]
    fn test_department_missing() {
        assert_eq!(department_score(None, None), 0.5);
        assert_eq!(department_score(Some("수학과"), None), 0.5);
    }

    #[test]
    fn test_age_diff_table() {
        assert_eq!(age_score(Some("2000-01-01"), Some("2000-12-31")), 1.0);
        assert_eq!(age_score(Some("2000-01-01"), Some("1999-01-01")), 0.9);
        assert_eq!(age_score(Some("2000-01-01"), Some("1998-01-01")), 0.8);
        assert_eq!(age_score(Some("2000-01-01"), Some("1997-01-01")), 0.7);
        assert_eq!(age_score(Some("2000-01-01"), Some("1995-01-01")), 0.6);
        assert_eq!(age_score(Some("2000-01-01"), Some("1993-01-01")), 0.4);
        assert_eq!(age_score(Some("2000-01-01"), Some("1990-01-01")), 0.2);
    }

    #[test]
    fn test_age_unparseable_is_neutral() {
        assert_eq!(age_score(Some("not-a-date"), Some("2000-01-01")), 0.5);
        assert_eq!(age_score(None, Some("2000-01-01")), 0.5);
    }

    #[test]
    fn test_height_diff_table() {
        assert_eq!(height_score(Some("175"), Some("177")), 1.0);
        assert_eq!(height_score(Some("175"), Some("180")), 0.9);
        assert_eq!(height_score(Some("175"), Some("185")), 0.8);
        assert_eq!(height_score(Some("175"), Some("190")), 0.6);
        assert_eq!(height_score(Some("175"), Some("195")), 0.4);
        assert_eq!(height_score(Some("175"), Some("200")), 0.2);
    }

    #[test]
    fn test_height_with_units() {
        assert_eq!(height_score(Some("175cm"), Some("175")), 1.0);
    }

    #[test]
    fn test_height_unparseable_is_neutral() {
        assert_eq!(height_score(Some("tall"), Some("175")), 0.5);
    }

    #[test]
    fn test_score_in_range_and_rounded() {
        let scorer = CompatibilityScorer::with_default_weights();
        let a = profile("a", "INTJ", &["독서"], &["차분한"], "컴퓨터공학과", "2000-01-01", "180");
        let b = profile("b", "ESFP", &["여행"], &["활발한"], "미술학과", "1992-01-01", "160");

        let score = scorer.score(&a, &b);
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(score, round2(score));
    }

    #[test]
    fn test_score_symmetry() {
        let scorer = CompatibilityScorer::with_default_weights();
        let mut a = profile("a", "INTJ", &["독서", "영화"], &["차분한"], "컴퓨터공학과", "2000-01-01", "180");
        a.ideal_type = Some(IdealType {
            mbti: Some("ENFP".to_string()),
            age_range: None,
            personality_keywords: vec!["활발한".to_string()],
        });
        let b = profile("b", "ENFP", &["독서", "여행"], &["활발한"], "전자공학과", "2000-06-01", "175");

        assert_eq!(scorer.score(&a, &b), scorer.score(&b, &a));
    }

    #[test]
    fn test_self_score_is_high() {
        let scorer = CompatibilityScorer::with_default_weights();
        let a = profile("a", "INTJ", &["독서", "영화"], &["차분한", "다정한"], "컴퓨터공학과", "2000-01-01", "180");

        assert!(scorer.score(&a, &a) > 0.6);
    }

    #[test]
    fn test_engineering_pair_scenario() {
        let scorer = CompatibilityScorer::with_default_weights();
        let a = profile("a", "INTJ", &["독서", "영화"], &[], "컴퓨터공학과", "2000-01-01", "180");
        let b = profile("b", "ENFP", &["독서", "여행"], &[], "전자공학과", "2000-06-01", "175");

        // compatible MBTI, one shared interest, same department group,
        // same birth year, 5cm apart
        assert!(scorer.score(&a, &b) > 0.6);
    }

    #[test]
    fn test_detailed_score_matches_total() {
        let scorer = CompatibilityScorer::with_default_weights();
        let a = profile("a", "INTJ", &["독서"], &["차분한"], "컴퓨터공학과", "2000-01-01", "180");
        let b = profile("b", "ENFP", &["독서"], &["차분한"], "전자공학과", "2001-01-01", "175");

        let breakdown = scorer.detailed_score(&a, &b);
        assert_eq!(breakdown.total, scorer.score(&a, &b));
        assert_eq!(breakdown.mbti, 0.9);
        assert_eq!(breakdown.department, 0.8);
        assert_eq!(breakdown.age, 0.9);
    }
}
