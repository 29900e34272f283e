//! Aggregate statistics over a list of meals.
//!
//! [`summarize`] is recomputed from scratch on every call. It never fails:
//! an empty list yields zeros, and odd values such as negative glass counts
//! are summed as-is.

use serde::Serialize;

use crate::meal::{MealRecord, MealType};

/// Number of meals of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealTypeCount {
    /// The meal type.
    #[serde(rename = "type")]
    pub meal_type: MealType,
    /// How many records have it.
    pub count: usize,
}

/// Glasses drunk of one kind of alcohol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlcoholTypeTotal {
    /// The drink, as typed by the user.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sum of glasses over records where alcohol was consumed.
    pub glasses: i64,
}

/// Summary of a list of meals.
///
/// Both breakdowns list entries in order of first appearance in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealSummary {
    /// Number of records.
    pub total_meals: usize,
    /// Records where alcohol was consumed.
    pub alcohol_occasions: usize,
    /// Glasses over records where alcohol was consumed.
    pub total_glasses: i64,
    /// Records with non-blank exercise.
    pub exercise_days: usize,
    /// Mean sensation score, 0 for an empty list.
    pub average_sensation_score: f64,
    /// Occurrences of each meal type present.
    pub meal_type_counts: Vec<MealTypeCount>,
    /// Glasses per non-empty alcohol kind.
    pub alcohol_type_totals: Vec<AlcoholTypeTotal>,
}

impl MealSummary {
    /// Count for a given meal type, 0 if it never appears.
    #[must_use]
    pub fn count_for(&self, meal_type: MealType) -> usize {
        self.meal_type_counts
            .iter()
            .find(|c| c.meal_type == meal_type)
            .map_or(0, |c| c.count)
    }

    /// Glasses for a given alcohol kind, 0 if it never appears.
    #[must_use]
    pub fn glasses_for(&self, kind: &str) -> i64 {
        self.alcohol_type_totals
            .iter()
            .find(|t| t.kind == kind)
            .map_or(0, |t| t.glasses)
    }
}

/// Compute the summary of `records`.
#[must_use]
pub fn summarize(records: &[MealRecord]) -> MealSummary {
    let mut summary = MealSummary {
        total_meals: records.len(),
        ..MealSummary::default()
    };
    // Wide accumulator: stored scores are not range-checked.
    let mut score_sum: i128 = 0;

    for record in records {
        score_sum += i128::from(record.sensation_score);

        if record.has_exercise() {
            summary.exercise_days += 1;
        }

        match summary
            .meal_type_counts
            .iter_mut()
            .find(|c| c.meal_type == record.meal_type)
        {
            Some(entry) => entry.count += 1,
            None => summary.meal_type_counts.push(MealTypeCount {
                meal_type: record.meal_type,
                count: 1,
            }),
        }

        if !record.alcohol.consumed {
            continue;
        }
        summary.alcohol_occasions += 1;
        summary.total_glasses = summary.total_glasses.saturating_add(record.alcohol.glasses);

        let kind = &record.alcohol.kind;
        if kind.is_empty() {
            continue;
        }
        match summary
            .alcohol_type_totals
            .iter_mut()
            .find(|t| &t.kind == kind)
        {
            Some(entry) => entry.glasses = entry.glasses.saturating_add(record.alcohol.glasses),
            None => summary.alcohol_type_totals.push(AlcoholTypeTotal {
                kind: kind.clone(),
                glasses: record.alcohol.glasses,
            }),
        }
    }

    if !records.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let mean = score_sum as f64 / records.len() as f64;
        summary.average_sensation_score = mean;
    }

    summary
}

impl std::fmt::Display for MealSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Summary")?;
        writeln!(f, "=======")?;
        writeln!(f, "Total meals:            {}", self.total_meals)?;
        writeln!(f, "Alcohol occasions:      {}", self.alcohol_occasions)?;
        writeln!(f, "Total glasses:          {}", self.total_glasses)?;
        writeln!(f, "Days with exercise:     {}", self.exercise_days)?;
        writeln!(
            f,
            "Average sensation:      {:.1}/10",
            self.average_sensation_score
        )?;

        writeln!(f)?;
        writeln!(f, "[Meals by type]")?;
        for entry in &self.meal_type_counts {
            writeln!(f, "  {:<22}{}", entry.meal_type.label(), entry.count)?;
        }

        writeln!(f)?;
        writeln!(f, "[Alcohol by type]")?;
        for entry in &self.alcohol_type_totals {
            writeln!(f, "  {:<22}{} glass(es)", entry.kind, entry.glasses)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::{parse_date, Alcohol};

    fn meal(meal_type: MealType) -> MealRecord {
        MealRecord::new(parse_date("2024-05-01").unwrap(), meal_type)
    }

    /// The two-record scenario: wine at lunch, a run after dinner.
    fn lunch_and_dinner() -> Vec<MealRecord> {
        vec![
            meal(MealType::Lunch)
                .with_alcohol(Alcohol::drank("wine", 2))
                .with_score(7),
            meal(MealType::Dinner)
                .with_exercise("run")
                .with_score(9),
        ]
    }

    #[test]
    fn test_lunch_and_dinner_scenario() {
        let summary = summarize(&lunch_and_dinner());

        assert_eq!(summary.total_meals, 2);
        assert_eq!(summary.alcohol_occasions, 1);
        assert_eq!(summary.total_glasses, 2);
        assert_eq!(summary.exercise_days, 1);
        assert!((summary.average_sensation_score - 8.0).abs() < f64::EPSILON);
        assert_eq!(
            summary.meal_type_counts,
            vec![
                MealTypeCount {
                    meal_type: MealType::Lunch,
                    count: 1
                },
                MealTypeCount {
                    meal_type: MealType::Dinner,
                    count: 1
                },
            ]
        );
        assert_eq!(
            summary.alcohol_type_totals,
            vec![AlcoholTypeTotal {
                kind: "wine".to_string(),
                glasses: 2
            }]
        );
    }

    #[test]
    fn test_empty_list() {
        let summary = summarize(&[]);

        assert_eq!(summary.total_meals, 0);
        assert_eq!(summary.alcohol_occasions, 0);
        assert_eq!(summary.total_glasses, 0);
        assert_eq!(summary.exercise_days, 0);
        assert!(summary.average_sensation_score.abs() < f64::EPSILON);
        assert!(summary.meal_type_counts.is_empty());
        assert!(summary.alcohol_type_totals.is_empty());
    }

    #[test]
    fn test_unconsumed_glasses_never_count() {
        let mut record = meal(MealType::Dinner);
        record.alcohol = Alcohol {
            consumed: false,
            kind: "beer".to_string(),
            glasses: 3,
        };
        let summary = summarize(&[record]);

        assert_eq!(summary.alcohol_occasions, 0);
        assert_eq!(summary.total_glasses, 0);
        assert!(summary.alcohol_type_totals.is_empty());
    }

    #[test]
    fn test_consumed_without_kind_counts_glasses_but_not_type() {
        let record = meal(MealType::Dinner).with_alcohol(Alcohol::drank("", 2));
        let summary = summarize(&[record]);

        assert_eq!(summary.alcohol_occasions, 1);
        assert_eq!(summary.total_glasses, 2);
        assert!(summary.alcohol_type_totals.is_empty());
    }

    #[test]
    fn test_alcohol_totals_grouped_in_first_appearance_order() {
        let records = vec![
            meal(MealType::Dinner).with_alcohol(Alcohol::drank("beer", 1)),
            meal(MealType::Lunch).with_alcohol(Alcohol::drank("wine", 2)),
            meal(MealType::Dinner).with_alcohol(Alcohol::drank("beer", 3)),
        ];
        let summary = summarize(&records);

        let kinds: Vec<&str> = summary
            .alcohol_type_totals
            .iter()
            .map(|t| t.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["beer", "wine"]);
        assert_eq!(summary.glasses_for("beer"), 4);
        assert_eq!(summary.glasses_for("wine"), 2);
        assert_eq!(summary.glasses_for("cider"), 0);
        assert_eq!(summary.total_glasses, 6);
    }

    #[test]
    fn test_alcohol_kind_is_case_sensitive() {
        let records = vec![
            meal(MealType::Dinner).with_alcohol(Alcohol::drank("Wine", 1)),
            meal(MealType::Dinner).with_alcohol(Alcohol::drank("wine", 1)),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.alcohol_type_totals.len(), 2);
    }

    #[test]
    fn test_meal_type_counts_sum_to_total() {
        let records = vec![
            meal(MealType::Snack),
            meal(MealType::Breakfast),
            meal(MealType::Snack),
            meal(MealType::Lunch),
            meal(MealType::Snack),
        ];
        let summary = summarize(&records);

        let sum: usize = summary.meal_type_counts.iter().map(|c| c.count).sum();
        assert_eq!(sum, records.len());
        assert_eq!(summary.meal_type_counts[0].meal_type, MealType::Snack);
        assert_eq!(summary.count_for(MealType::Snack), 3);
        assert_eq!(summary.count_for(MealType::Dinner), 0);
    }

    #[test]
    fn test_whitespace_exercise_is_not_exercise() {
        let records = vec![
            meal(MealType::Lunch).with_exercise("   "),
            meal(MealType::Lunch).with_exercise(" swim "),
        ];
        assert_eq!(summarize(&records).exercise_days, 1);
    }

    #[test]
    fn test_average_is_mean_of_scores() {
        let records = vec![
            meal(MealType::Lunch).with_score(1),
            meal(MealType::Lunch).with_score(2),
            meal(MealType::Lunch).with_score(2),
        ];
        let summary = summarize(&records);
        assert!((summary.average_sensation_score - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{:.1}", summary.average_sensation_score), "1.7");
    }

    #[test]
    fn test_negative_glasses_pass_through() {
        let records = vec![
            meal(MealType::Lunch).with_alcohol(Alcohol::drank("wine", 3)),
            meal(MealType::Lunch).with_alcohol(Alcohol::drank("wine", -1)),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_glasses, 2);
        assert_eq!(summary.glasses_for("wine"), 2);
    }

    #[test]
    fn test_display_contains_sections() {
        let text = summarize(&lunch_and_dinner()).to_string();
        assert!(text.contains("Total meals:            2"));
        assert!(text.contains("8.0/10"));
        assert!(text.contains("Lunch"));
        assert!(text.contains("wine"));
        assert!(text.contains("2 glass(es)"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let big = meal(MealType::Lunch)
            .with_alcohol(Alcohol::drank("wine", i64::MAX))
            .with_score(i64::MAX);
        let summary = summarize(&[big.clone(), big]);

        assert_eq!(summary.total_glasses, i64::MAX);
        assert_eq!(summary.glasses_for("wine"), i64::MAX);
        #[allow(clippy::cast_precision_loss)]
        let expected = i64::MAX as f64;
        assert!((summary.average_sensation_score - expected).abs() <= expected * f64::EPSILON);
    }

    #[test]
    fn test_summary_serialization() {
        let json = serde_json::to_value(summarize(&lunch_and_dinner())).unwrap();
        assert_eq!(json["total_meals"], 2);
        assert_eq!(json["meal_type_counts"][0]["type"], "lunch");
        assert_eq!(json["alcohol_type_totals"][0]["type"], "wine");
        assert_eq!(json["alcohol_type_totals"][0]["glasses"], 2);
    }
}
